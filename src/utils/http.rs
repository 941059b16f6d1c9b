//! HTTP client utilities.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::sync::Arc;

use super::retry::{with_retry, AttemptError, RetryPolicy};
use crate::config::ClientConfig;
use crate::scholar::{ScholarError, Transport};

/// Shared HTTP client: one cookie jar and one header set for every request
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a client from the `[client]` configuration section
    pub fn new(config: &ClientConfig) -> Result<Self, ScholarError> {
        let mut headers = HeaderMap::new();
        let language = HeaderValue::from_str(&config.accept_language)
            .map_err(|e| ScholarError::Config(format!("Invalid accept_language: {}", e)))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ScholarError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// [`Transport`] over HTTP with fixed-delay retries
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: HttpClient,
    policy: RetryPolicy,
}

impl HttpTransport {
    pub fn new(client: HttpClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, ScholarError> {
        let client = self.client.client();
        tracing::debug!("GET {}", url);

        with_retry(self.policy, move || async move {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| ScholarError::Network(format!("Failed to fetch {}: {}", url, e)))?;

            match response.status() {
                StatusCode::OK => response.text().await.map_err(|e| {
                    AttemptError::Fatal(ScholarError::Network(format!(
                        "Failed to read response body: {}",
                        e
                    )))
                }),
                StatusCode::TOO_MANY_REQUESTS => {
                    tracing::warn!("Rate limited while fetching {}", url);
                    Err(AttemptError::Fatal(ScholarError::RateLimited))
                }
                status => Err(AttemptError::Status(status.as_u16())),
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_from_default_config() {
        let client = HttpClient::new(&ClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_bad_header() {
        let config = ClientConfig {
            accept_language: "en\nUS".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            HttpClient::new(&config),
            Err(ScholarError::Config(_))
        ));
    }
}
