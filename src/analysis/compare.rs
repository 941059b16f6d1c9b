//! Side-by-side citation tables for several scholars.

use std::collections::BTreeMap;

use crate::models::{CareerPoint, CitationYearCount, Publication, PublicationQuery, ScholarYearTotal};
use crate::scholar::{ScholarClient, ScholarError};
use crate::utils::tidy_id;

/// Sum citations by publication year, with a running total.
///
/// Publications without a known year are left out. Rows are ascending by year.
pub fn yearly_citation_totals(
    id: &str,
    name: &str,
    publications: &[Publication],
) -> Vec<ScholarYearTotal> {
    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();
    for publication in publications {
        if let Some(year) = publication.year {
            *by_year.entry(year).or_insert(0) += publication.cites;
        }
    }

    let mut total = 0;
    by_year
        .into_iter()
        .map(|(year, cites)| {
            total += cites;
            ScholarYearTotal {
                id: id.to_string(),
                name: name.to_string(),
                year,
                cites,
                total,
            }
        })
        .collect()
}

/// Tag a citation history with the scholar, optionally re-based to career years
pub fn career_points(
    id: &str,
    name: &str,
    history: &[CitationYearCount],
    career: bool,
) -> Vec<CareerPoint> {
    let first_year = history.iter().map(|c| c.year).min();

    history
        .iter()
        .map(|c| CareerPoint {
            id: id.to_string(),
            name: name.to_string(),
            year: c.year,
            cites: c.cites,
            career_year: if career {
                first_year.map(|first| c.year - first)
            } else {
                None
            },
        })
        .collect()
}

impl ScholarClient {
    /// Citations by publication year for each scholar, concatenated in input order
    pub async fn compare_scholars<S: AsRef<str>>(
        &self,
        scholar_ids: &[S],
        page_size: usize,
    ) -> Result<Vec<ScholarYearTotal>, ScholarError> {
        let mut rows = Vec::new();

        for id in scholar_ids {
            let id = tidy_id(id.as_ref());
            let name = self.profile(&id).await?.name;
            let publications = self
                .publications(&id, PublicationQuery::new().page_size(page_size))
                .await?
                .into_value();

            tracing::debug!("{}: {} publications", name, publications.len());
            rows.extend(yearly_citation_totals(&id, &name, &publications));
        }

        Ok(rows)
    }

    /// Yearly citation histories for each scholar, concatenated in input order.
    ///
    /// With `career`, each row also carries its year relative to that
    /// scholar's first cited year.
    pub async fn compare_careers<S: AsRef<str>>(
        &self,
        scholar_ids: &[S],
        career: bool,
    ) -> Result<Vec<CareerPoint>, ScholarError> {
        let mut rows = Vec::new();

        for id in scholar_ids {
            let id = tidy_id(id.as_ref());
            let name = self.profile(&id).await?.name;
            let history = self.citation_history(&id).await?;
            rows.extend(career_points(&id, &name, &history, career));
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publication(year: Option<i32>, cites: u64) -> Publication {
        Publication {
            year,
            cites,
            ..Publication::default()
        }
    }

    #[test]
    fn test_yearly_totals_skip_unknown_years() {
        let pubs = vec![
            publication(Some(2012), 10),
            publication(None, 500),
            publication(Some(2010), 3),
            publication(Some(2012), 5),
        ];

        let rows = yearly_citation_totals("X", "Ex Ample", &pubs);

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].year, rows[0].cites, rows[0].total), (2010, 3, 3));
        assert_eq!((rows[1].year, rows[1].cites, rows[1].total), (2012, 15, 18));
        assert!(rows.iter().all(|r| r.id == "X" && r.name == "Ex Ample"));
    }

    #[test]
    fn test_career_points() {
        let history = vec![
            CitationYearCount::new(2015, 1),
            CitationYearCount::new(2016, 4),
            CitationYearCount::new(2017, 9),
        ];

        let aligned = career_points("X", "X", &history, true);
        assert_eq!(
            aligned.iter().map(|p| p.career_year).collect::<Vec<_>>(),
            vec![Some(0), Some(1), Some(2)]
        );

        let plain = career_points("X", "X", &history, false);
        assert!(plain.iter().all(|p| p.career_year.is_none()));
        assert_eq!(plain[2].cites, 9);
    }
}
