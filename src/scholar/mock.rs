//! Mock transport for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use super::{ScholarError, Transport};

type Responder = Box<dyn Fn(&str) -> Result<String, ScholarError> + Send + Sync>;

/// A transport that serves canned pages and records every request.
///
/// Pages are looked up by exact URL first, then the responder closure (if
/// any) is asked. Anything else answers like a missing page: `Unreachable`
/// with status 404.
#[derive(Default)]
pub struct MockTransport {
    pages: Mutex<HashMap<String, String>>,
    responder: Option<Responder>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    /// Create a mock with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that answers every URL with `responder`.
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, ScholarError> + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::default()
        }
    }

    /// Serve `body` for exactly `url`.
    pub fn insert(&self, url: impl Into<String>, body: impl Into<String>) {
        let mut guard = self.pages.lock().unwrap();
        guard.insert(url.into(), body.into());
    }

    /// Every URL requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("pages", &self.pages.lock().unwrap().len())
            .field("responder", &self.responder.is_some())
            .field("requests", &self.request_count())
            .finish()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<String, ScholarError> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(body) = self.pages.lock().unwrap().get(url) {
            return Ok(body.clone());
        }

        match &self.responder {
            Some(responder) => responder(url),
            None => Err(ScholarError::Unreachable {
                status: 404,
                attempts: 1,
            }),
        }
    }
}

/// Value of query parameter `name` in `url`, if present
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_and_records() {
        let mock = MockTransport::new();
        mock.insert("https://x.org/a", "page a");

        assert_eq!(mock.get("https://x.org/a").await.unwrap(), "page a");
        assert!(matches!(
            mock.get("https://x.org/b").await,
            Err(ScholarError::Unreachable { status: 404, .. })
        ));
        assert_eq!(mock.requests(), vec!["https://x.org/a", "https://x.org/b"]);
    }

    #[tokio::test]
    async fn test_mock_responder() {
        let mock = MockTransport::from_fn(|url| Ok(format!("echo {}", url)));
        assert_eq!(mock.get("u").await.unwrap(), "echo u");
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_query_param() {
        let url = "https://scholar.google.com/citations?hl=en&user=abc&cstart=200";
        assert_eq!(query_param(url, "cstart").as_deref(), Some("200"));
        assert_eq!(query_param(url, "pagesize"), None);
        assert_eq!(query_param("not a url", "user"), None);
    }
}
