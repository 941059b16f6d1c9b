//! The scholar client: URL building and single-page operations.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::{extract, Outcome, ScholarError, ScholarWarning, Transport};
use crate::config::{Config, PacingConfig};
use crate::models::{ArticleCitationHistory, CitationYearCount, PublicationDetail, ScholarProfile};
use crate::utils::{all_ids, tidy_id, to_initials, HttpClient, HttpTransport};

/// Most author-detail pages fetched in one call before the site starts blocking
pub const MAX_AUTHOR_LOOKUPS: usize = 50;

/// Client for one scholar site (or mirror).
///
/// Every operation issues its requests sequentially through the shared
/// [`Transport`], whose cookie jar and headers persist across calls.
/// [`ScholarClient::set_mirror`] takes `&mut self`, so the base URL cannot
/// change while an operation borrowing the client is in flight.
#[derive(Debug, Clone)]
pub struct ScholarClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    pacing: PacingConfig,
    top_venues: Vec<String>,
}

impl ScholarClient {
    /// Create a client backed by HTTP, configured from `config`
    pub fn new(config: &Config) -> Result<Self, ScholarError> {
        let http = HttpClient::new(&config.client)?;
        let transport = HttpTransport::new(http, config.retry.policy());
        Self::with_transport(Arc::new(transport), config)
    }

    /// Create a client over any transport
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        config: &Config,
    ) -> Result<Self, ScholarError> {
        let mut client = Self {
            transport,
            base_url: String::new(),
            pacing: config.pacing.clone(),
            top_venues: config.prediction.top_venues.clone(),
        };
        client.set_mirror(&config.client.base_url)?;
        Ok(client)
    }

    /// Point subsequent requests at another origin (a mirror).
    pub fn set_mirror(&mut self, mirror: &str) -> Result<(), ScholarError> {
        let mirror = mirror.trim().trim_end_matches('/');
        url::Url::parse(mirror)
            .map_err(|e| ScholarError::Config(format!("Invalid base URL '{}': {}", mirror, e)))?;

        if !self.base_url.is_empty() {
            tracing::info!("Switching scholar site from {} to {}", self.base_url, mirror);
        }
        self.base_url = mirror.to_string();
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    /// Venues counted as top venues by default
    pub fn top_venues(&self) -> &[String] {
        &self.top_venues
    }

    pub(crate) async fn fetch(&self, url: &str) -> Result<String, ScholarError> {
        self.transport.get(url).await
    }

    // ========== URLS ==========

    pub fn profile_url(&self, scholar_id: &str) -> String {
        format!("{}/citations?hl=en&user={}", self.base_url, tidy_id(scholar_id))
    }

    pub(crate) fn histogram_url(&self, scholar_id: &str) -> String {
        format!(
            "{}/citations?hl=en&user={}&pagesize=100&view_op=list_works",
            self.base_url,
            tidy_id(scholar_id)
        )
    }

    /// Detail page of one publication, as linked from the profile
    pub fn article_scholar_url(&self, scholar_id: &str, pubid: &str) -> String {
        let id = tidy_id(scholar_id);
        format!(
            "{}/citations?view_op=view_citation&hl=en&user={}&citation_for_view={}:{}",
            self.base_url, id, id, pubid
        )
    }

    fn article_history_url(&self, scholar_id: &str, pubid: &str) -> String {
        format!(
            "{}/citations?view_op=view_citation&hl=en&citation_for_view={}:{}",
            self.base_url,
            tidy_id(scholar_id),
            pubid
        )
    }

    fn author_detail_url(&self, scholar_id: &str, pubid: &str) -> String {
        format!(
            "{}/citations?view_op=view_citation&citation_for_view={}:{}",
            self.base_url,
            tidy_id(scholar_id),
            pubid
        )
    }

    fn author_search_url(&self, query: &str) -> String {
        format!(
            "{}/citations?view_op=search_authors&mauthors={}&hl=en&oi=ao",
            self.base_url, query
        )
    }

    // ========== PROFILES ==========

    /// Fetch and extract a scholar's profile
    pub async fn profile(&self, scholar_id: &str) -> Result<ScholarProfile, ScholarError> {
        let id = tidy_id(scholar_id);
        let body = self.fetch(&self.profile_url(&id)).await?;
        Ok(extract::profile(&body, &id, &self.base_url))
    }

    /// Look up a scholar identifier by name.
    ///
    /// With several candidates the first is returned, unless `affiliation`
    /// is given: then candidate profiles are fetched in turn and the first
    /// whose affiliation contains it (case-insensitively) wins.
    pub async fn search_scholar_id(
        &self,
        last_name: &str,
        first_name: &str,
        affiliation: Option<&str>,
    ) -> Result<Outcome<Option<String>>, ScholarError> {
        let names: Vec<String> = [first_name.trim(), last_name.trim()]
            .iter()
            .filter(|name| !name.is_empty())
            .map(|name| urlencoding::encode(name).into_owned())
            .collect();

        if names.is_empty() {
            return Err(ScholarError::InvalidRequest(
                "at least one of first name or last name is required".to_string(),
            ));
        }

        let query = names.join("+");
        let body = self.fetch(&self.author_search_url(&query)).await?;
        let ids = all_ids(&body);

        let Some(first) = ids.first().cloned() else {
            return Ok(Outcome::new(None).with_warning(ScholarWarning::EmptyResult(format!(
                "no scholar ID found for '{}'",
                query
            ))));
        };

        if ids.len() == 1 {
            return Ok(Outcome::new(Some(first)));
        }

        let Some(affiliation) = affiliation else {
            return Ok(
                Outcome::new(Some(first.clone())).with_warning(ScholarWarning::AmbiguousResult(
                    format!("found {} candidates; returning first: {}", ids.len(), first),
                )),
            );
        };

        let wanted = affiliation.to_lowercase();
        for id in &ids {
            match self.profile(id).await {
                Ok(profile) if profile.affiliation.to_lowercase().contains(&wanted) => {
                    return Ok(Outcome::new(Some(id.clone())).with_warning(
                        ScholarWarning::AmbiguousResult(format!(
                            "found {} candidates; picked {} by affiliation",
                            ids.len(),
                            id
                        )),
                    ));
                }
                Ok(_) => {}
                Err(e) if e.is_skippable() => {
                    tracing::debug!("Skipping candidate {}: {}", id, e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Outcome::new(None).with_warning(ScholarWarning::EmptyResult(format!(
            "no researcher found at '{}'",
            affiliation
        ))))
    }

    // ========== CITATION HISTORY ==========

    /// Yearly citations of the whole profile (roughly the last dozen years)
    pub async fn citation_history(
        &self,
        scholar_id: &str,
    ) -> Result<Vec<CitationYearCount>, ScholarError> {
        let body = self.fetch(&self.histogram_url(scholar_id)).await?;
        Ok(extract::citation_histogram(&body))
    }

    /// Yearly citations of a single article, gap-free between its first and last cited year
    pub async fn article_citation_history(
        &self,
        scholar_id: &str,
        pubid: &str,
    ) -> Result<ArticleCitationHistory, ScholarError> {
        let body = self
            .fetch(&self.article_history_url(scholar_id, pubid))
            .await?;

        Ok(ArticleCitationHistory {
            pubid: pubid.to_string(),
            series: extract::article_citation_history(&body),
        })
    }

    // ========== PUBLICATION DETAILS ==========

    /// Every field of a publication's detail page
    pub async fn publication_detail(
        &self,
        scholar_id: &str,
        pubid: &str,
    ) -> Result<PublicationDetail, ScholarError> {
        let body = self
            .fetch(&self.article_scholar_url(scholar_id, pubid))
            .await?;
        Ok(extract::publication_detail(&body))
    }

    pub async fn publication_abstract(
        &self,
        scholar_id: &str,
        pubid: &str,
    ) -> Result<String, ScholarError> {
        Ok(self.publication_detail(scholar_id, pubid).await?.r#abstract)
    }

    pub async fn publication_url(
        &self,
        scholar_id: &str,
        pubid: &str,
    ) -> Result<String, ScholarError> {
        Ok(self.publication_detail(scholar_id, pubid).await?.url)
    }

    pub async fn publication_date(
        &self,
        scholar_id: &str,
        pubid: &str,
    ) -> Result<String, ScholarError> {
        let detail = self.publication_detail(scholar_id, pubid).await?;
        Ok(detail.publication_date().to_string())
    }

    /// Full author lists for up to [`MAX_AUTHOR_LOOKUPS`] publications.
    ///
    /// Publication lists truncate long author strings; the detail page does
    /// not. Pages are fetched one by one with a jittered pause in between.
    /// With `initials`, given names are reduced to their first letters.
    pub async fn complete_authors<S: AsRef<str>>(
        &self,
        scholar_id: &str,
        pubids: &[S],
        initials: bool,
    ) -> Result<Vec<String>, ScholarError> {
        if pubids.len() > MAX_AUTHOR_LOOKUPS {
            return Err(ScholarError::InvalidRequest(format!(
                "requesting more than {} publications risks being blocked",
                MAX_AUTHOR_LOOKUPS
            )));
        }

        let id = tidy_id(scholar_id);
        let mut authors = Vec::with_capacity(pubids.len());

        for (i, pubid) in pubids.iter().enumerate() {
            if i > 0 {
                sleep(jittered(self.pacing.author_detail_delay())).await;
            }

            let body = self
                .fetch(&self.author_detail_url(&id, pubid.as_ref()))
                .await?;
            let full = extract::detail_authors(&body);
            authors.push(if initials { to_initials(&full) } else { full });
        }

        Ok(authors)
    }
}

/// `mean` shifted by a uniform offset in ±0.5 s, never negative; zero stays zero
fn jittered(mean: Duration) -> Duration {
    if mean.is_zero() {
        return Duration::ZERO;
    }
    let offset = fastrand::f64() - 0.5;
    Duration::from_secs_f64((mean.as_secs_f64() + offset).max(0.0))
}
