//! Publication listings, fetched page by page.

use super::{extract, Outcome, ScholarClient, ScholarError, ScholarWarning};
use crate::models::{Publication, PublicationQuery, PublicationSort};
use crate::utils::tidy_id;

impl ScholarClient {
    fn publications_url(
        &self,
        scholar_id: &str,
        start: usize,
        page_size: usize,
        sort: PublicationSort,
    ) -> String {
        format!(
            "{}/citations?hl=en&user={}&cstart={}&pagesize={}{}",
            self.base_url(),
            scholar_id,
            start,
            page_size,
            sort.query_fragment()
        )
    }

    /// List a scholar's publications.
    ///
    /// Pages are requested one after another from `query.start`. A page
    /// shorter than the page size ends the listing, as does reaching
    /// `query.stop`. Page sizes above [`PublicationQuery::MAX_PAGE_SIZE`] are
    /// capped with a warning.
    pub async fn publications(
        &self,
        scholar_id: &str,
        query: PublicationQuery,
    ) -> Result<Outcome<Vec<Publication>>, ScholarError> {
        if query.page_size == 0 {
            return Err(ScholarError::InvalidRequest(
                "page size must be at least 1".to_string(),
            ));
        }

        let id = tidy_id(scholar_id);
        let mut outcome = Outcome::new(Vec::new());

        let page_size = if query.page_size > PublicationQuery::MAX_PAGE_SIZE {
            outcome.warn(ScholarWarning::PageSizeCapped {
                requested: query.page_size,
                used: PublicationQuery::MAX_PAGE_SIZE,
            });
            PublicationQuery::MAX_PAGE_SIZE
        } else {
            query.page_size
        };

        let mut start = query.start;
        let mut pages = 0;
        loop {
            let url = self.publications_url(&id, start, page_size, query.sort);
            let body = self.fetch(&url).await?;
            let rows = extract::publication_rows(&body);
            pages += 1;

            let fetched = rows.len();
            tracing::debug!("Page {} of {}: {} rows at offset {}", pages, id, fetched, start);
            outcome.value.extend(rows);

            start += page_size;
            let below_stop = query.stop.map_or(true, |stop| start < stop);
            if fetched != page_size || !below_stop {
                break;
            }
        }

        tracing::debug!(
            "Listed {} publications of {} in {} pages",
            outcome.value.len(),
            id,
            pages
        );
        Ok(outcome)
    }

    /// Every publication, most cited first, in pages of 100
    pub async fn all_publications(
        &self,
        scholar_id: &str,
    ) -> Result<Vec<Publication>, ScholarError> {
        Ok(self
            .publications(scholar_id, PublicationQuery::default())
            .await?
            .into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, PacingConfig};
    use crate::scholar::mock::query_param;
    use crate::scholar::MockTransport;
    use std::sync::Arc;

    fn rows_page(start: usize, count: usize) -> String {
        let rows: String = (start..start + count)
            .map(|i| {
                format!(
                    r#"<tr class="gsc_a_tr"><td class="gsc_a_t"><a class="gsc_a_at" href="/citations?view_op=view_citation&amp;citation_for_view=abc:p{i}">Paper {i}</a></td></tr>"#
                )
            })
            .collect();
        format!("<table><tbody>{}</tbody></table>", rows)
    }

    fn paged_mock(total: usize) -> Arc<MockTransport> {
        Arc::new(MockTransport::from_fn(move |url| {
            let start: usize = query_param(url, "cstart")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            let size: usize = query_param(url, "pagesize")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            let count = total.saturating_sub(start).min(size);
            Ok(rows_page(start, count))
        }))
    }

    fn client(mock: Arc<MockTransport>) -> ScholarClient {
        let mut config = Config::default();
        config.pacing = PacingConfig::none();
        ScholarClient::with_transport(mock, &config).unwrap()
    }

    #[tokio::test]
    async fn test_short_page_ends_listing() {
        let mock = paged_mock(250);
        let client = client(mock.clone());

        let outcome = client
            .publications("abc", PublicationQuery::new())
            .await
            .unwrap();

        assert_eq!(outcome.value.len(), 250);
        assert_eq!(mock.request_count(), 3);
        assert!(!outcome.has_warnings());
        assert_eq!(outcome.value[249].pubid, "p249");
    }

    #[tokio::test]
    async fn test_stop_limits_requests() {
        let mock = paged_mock(1000);
        let client = client(mock.clone());

        let outcome = client
            .publications("abc", PublicationQuery::new().page_size(20).stop(50))
            .await
            .unwrap();

        // offsets 0, 20, 40; the next offset 60 is past the stop
        assert_eq!(mock.request_count(), 3);
        assert_eq!(outcome.value.len(), 60);
    }

    #[tokio::test]
    async fn test_page_size_capped() {
        let mock = paged_mock(30);
        let client = client(mock.clone());

        let outcome = client
            .publications("abc", PublicationQuery::new().page_size(500))
            .await
            .unwrap();

        assert_eq!(outcome.value.len(), 30);
        assert_eq!(
            outcome.warnings,
            vec![ScholarWarning::PageSizeCapped {
                requested: 500,
                used: 100
            }]
        );
        assert_eq!(query_param(&mock.requests()[0], "pagesize").as_deref(), Some("100"));
    }

    #[tokio::test]
    async fn test_sort_by_year_in_url() {
        let mock = paged_mock(0);
        let client = client(mock.clone());

        client
            .publications("abc", PublicationQuery::new().sort(PublicationSort::Year))
            .await
            .unwrap();

        assert_eq!(query_param(&mock.requests()[0], "sortby").as_deref(), Some("pubdate"));
    }

    #[tokio::test]
    async fn test_zero_page_size_rejected() {
        let client = client(paged_mock(10));
        let result = client
            .publications("abc", PublicationQuery::new().page_size(0))
            .await;
        assert!(matches!(result, Err(ScholarError::InvalidRequest(_))));
    }
}
