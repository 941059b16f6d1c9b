//! Coauthor network traversal.

use std::collections::{HashMap, HashSet};
use tokio::time::sleep;

use super::{ScholarClient, ScholarError};
use crate::models::{CoauthorEdge, ScholarProfile};
use crate::utils::{tidy_id, title_case};

impl ScholarClient {
    /// Walk the coauthor network outward from `scholar_id`.
    ///
    /// Level 0 holds the first `breadth` coauthors of the seed. Each further
    /// level, up to `depth`, fetches the profiles of at most `breadth`
    /// coauthors found on the previous level and records their first
    /// `breadth` coauthors in turn. Profiles are fetched one at a time with
    /// the configured pause before each; a profile is fetched at most once
    /// per traversal. Coauthors without a derivable identifier, or whose
    /// profile cannot be reached, are not expanded.
    ///
    /// Edges come back in discovery order with title-cased names. Repeat
    /// visits produce repeat edges.
    pub async fn coauthor_network(
        &self,
        scholar_id: &str,
        breadth: usize,
        depth: usize,
    ) -> Result<Vec<CoauthorEdge>, ScholarError> {
        if breadth == 0 {
            return Ok(Vec::new());
        }

        let seed = self.profile(scholar_id).await?;
        let mut edges = Vec::new();
        let mut frontier = record_level(&seed, breadth, &mut edges);

        let mut visited: HashMap<String, ScholarProfile> = HashMap::new();
        let mut unreachable: HashSet<String> = HashSet::new();
        visited.insert(seed.id.clone(), seed);

        for level in 1..=depth {
            if frontier.is_empty() {
                break;
            }
            tracing::info!(
                "Coauthor level {}: expanding {} scholars",
                level,
                frontier.len()
            );

            let mut next = Vec::new();
            for id in frontier {
                if unreachable.contains(&id) {
                    continue;
                }

                if !visited.contains_key(&id) {
                    sleep(self.pacing().coauthor_pause()).await;
                    match self.profile(&id).await {
                        Ok(profile) => {
                            visited.insert(id.clone(), profile);
                        }
                        Err(e) if e.is_skippable() => {
                            tracing::debug!("Skipping coauthor {}: {}", id, e);
                            unreachable.insert(id);
                            continue;
                        }
                        Err(e) => return Err(e),
                    }
                }

                if let Some(profile) = visited.get(&id) {
                    next.extend(record_level(profile, breadth, &mut edges));
                }
            }

            next.truncate(breadth);
            frontier = next;
        }

        tracing::debug!("Coauthor network of {}: {} edges", scholar_id, edges.len());
        Ok(edges)
    }
}

/// Push edges for the first `breadth` coauthors of `profile` and return
/// their identifiers.
fn record_level(
    profile: &ScholarProfile,
    breadth: usize,
    edges: &mut Vec<CoauthorEdge>,
) -> Vec<String> {
    let author = title_case(&profile.name);

    profile
        .coauthors
        .iter()
        .take(breadth)
        .filter_map(|link| {
            let coauthor_id = link.id.as_deref().map(tidy_id);
            edges.push(CoauthorEdge {
                author: author.clone(),
                coauthor: title_case(&link.name),
                coauthor_id: coauthor_id.clone(),
            });
            coauthor_id
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, PacingConfig};
    use crate::scholar::MockTransport;
    use std::sync::Arc;

    fn profile_page(name: &str, coauthors: &[(&str, Option<&str>)]) -> String {
        let links: String = coauthors
            .iter()
            .map(|(name, id)| match id {
                Some(id) => format!(r#"<a tabindex="-1" href="/citations?user={id}&hl=en">{name}</a>"#),
                None => format!(r#"<a tabindex="-1" href="https://elsewhere.org">{name}</a>"#),
            })
            .collect();
        format!(
            r##"<html><body><div id="gsc_prf_in">{name}</div><a tabindex="-1" href="#">Sort by year</a>{links}</body></html>"##
        )
    }

    fn client(mock: Arc<MockTransport>) -> ScholarClient {
        let mut config = Config::default();
        config.pacing = PacingConfig::none();
        ScholarClient::with_transport(mock, &config).unwrap()
    }

    fn insert(mock: &MockTransport, client: &ScholarClient, id: &str, page: String) {
        mock.insert(client.profile_url(id), page);
    }

    #[tokio::test]
    async fn test_depth_zero_lists_direct_coauthors() {
        let mock = Arc::new(MockTransport::new());
        let client = client(mock.clone());
        insert(
            &mock,
            &client,
            "SEED",
            profile_page("ada lovelace", &[("CHARLES BABBAGE", Some("CB")), ("Mary Somerville", None)]),
        );

        let edges = client.coauthor_network("SEED", 5, 0).await.unwrap();

        assert_eq!(mock.request_count(), 1);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].author, "Ada Lovelace");
        assert_eq!(edges[0].coauthor, "Charles Babbage");
        assert_eq!(edges[0].coauthor_id.as_deref(), Some("CB"));
        assert_eq!(edges[1].coauthor_id, None);
    }

    #[tokio::test]
    async fn test_breadth_limits_fetches() {
        let mock = Arc::new(MockTransport::from_fn(|url| {
            let id = crate::scholar::mock::query_param(url, "user").unwrap_or_default();
            let coauthors: Vec<(String, String)> = (0..4)
                .map(|i| (format!("{} child {}", id, i), format!("{}{}", id, i)))
                .collect();
            let refs: Vec<(&str, Option<&str>)> = coauthors
                .iter()
                .map(|(name, id)| (name.as_str(), Some(id.as_str())))
                .collect();
            Ok(profile_page(&id, &refs))
        }));
        let client = client(mock.clone());

        let (breadth, depth) = (2, 2);
        let edges = client.coauthor_network("R", breadth, depth).await.unwrap();

        assert!(mock.request_count() <= breadth * (depth + 1));
        assert_eq!(mock.request_count(), 1 + breadth * depth);
        assert_eq!(edges.len(), breadth + breadth * breadth * depth);
    }

    #[tokio::test]
    async fn test_unreachable_coauthor_skipped_once() {
        let mock = Arc::new(MockTransport::new());
        let client = client(mock.clone());
        insert(
            &mock,
            &client,
            "SEED",
            profile_page("Seed", &[("Gone", Some("GONE")), ("Gone Again", Some("GONE"))]),
        );

        let edges = client.coauthor_network("SEED", 3, 1).await.unwrap();

        assert_eq!(edges.len(), 2);
        let gone = client.profile_url("GONE");
        assert_eq!(mock.requests().iter().filter(|u| **u == gone).count(), 1);
    }

    #[tokio::test]
    async fn test_coauthor_without_id_not_expanded() {
        let mock = Arc::new(MockTransport::new());
        let client = client(mock.clone());
        insert(
            &mock,
            &client,
            "SEED",
            profile_page("Ada Lovelace", &[("Mary Somerville", None), ("Charles Babbage", Some("CB"))]),
        );
        insert(&mock, &client, "CB", profile_page("Charles Babbage", &[]));

        let edges = client.coauthor_network("SEED", 5, 1).await.unwrap();

        assert_eq!(mock.request_count(), 2);
        assert_eq!(
            mock.requests(),
            vec![client.profile_url("SEED"), client.profile_url("CB")]
        );
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].coauthor, "Mary Somerville");
        assert_eq!(edges[0].coauthor_id, None);
    }

    #[tokio::test]
    async fn test_rate_limit_aborts_traversal() {
        let mock = Arc::new(MockTransport::from_fn(|_| Err(ScholarError::RateLimited)));
        let client = client(mock.clone());
        insert(&mock, &client, "SEED", profile_page("Seed", &[("Next", Some("NEXT"))]));

        let result = client.coauthor_network("SEED", 3, 1).await;
        assert!(matches!(result, Err(ScholarError::RateLimited)));
    }

    #[tokio::test]
    async fn test_zero_breadth_fetches_nothing() {
        let mock = Arc::new(MockTransport::new());
        let client = client(mock.clone());

        let edges = client.coauthor_network("SEED", 0, 3).await.unwrap();
        assert!(edges.is_empty());
        assert_eq!(mock.request_count(), 0);
    }
}
