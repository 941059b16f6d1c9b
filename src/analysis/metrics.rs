//! Counts derived from a publication listing.

use std::collections::HashSet;

use crate::models::Publication;
use crate::scholar::{ScholarClient, ScholarError};

/// Year of the oldest publication with a known year
pub fn oldest_year(publications: &[Publication]) -> Option<i32> {
    publications.iter().filter_map(|p| p.year).min()
}

/// Number of distinct venue names, the empty venue included
pub fn distinct_journals(publications: &[Publication]) -> usize {
    publications
        .iter()
        .map(|p| p.journal.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Number of publications whose venue is exactly one of `venues`
pub fn top_journal_count<S: AsRef<str>>(publications: &[Publication], venues: &[S]) -> usize {
    publications
        .iter()
        .filter(|p| venues.iter().any(|v| v.as_ref() == p.journal))
        .count()
}

impl ScholarClient {
    pub async fn num_articles(&self, scholar_id: &str) -> Result<usize, ScholarError> {
        Ok(self.all_publications(scholar_id).await?.len())
    }

    pub async fn oldest_article(&self, scholar_id: &str) -> Result<Option<i32>, ScholarError> {
        Ok(oldest_year(&self.all_publications(scholar_id).await?))
    }

    pub async fn num_distinct_journals(&self, scholar_id: &str) -> Result<usize, ScholarError> {
        Ok(distinct_journals(&self.all_publications(scholar_id).await?))
    }

    /// Publications in `venues`, or in the configured top venues when `None`
    pub async fn num_top_journals(
        &self,
        scholar_id: &str,
        venues: Option<&[String]>,
    ) -> Result<usize, ScholarError> {
        let publications = self.all_publications(scholar_id).await?;
        let venues = venues.unwrap_or(self.top_venues());
        Ok(top_journal_count(&publications, venues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publication(journal: &str, year: Option<i32>) -> Publication {
        Publication {
            journal: journal.to_string(),
            year,
            ..Publication::default()
        }
    }

    #[test]
    fn test_publication_counts() {
        let pubs = vec![
            publication("Nature", Some(2011)),
            publication("Neuron", None),
            publication("Nature", Some(2008)),
            publication("", Some(2015)),
            publication("Nature Methods", Some(2019)),
        ];

        assert_eq!(oldest_year(&pubs), Some(2008));
        assert_eq!(distinct_journals(&pubs), 4);
        assert_eq!(top_journal_count(&pubs, &["Nature", "Neuron"]), 3);
        assert_eq!(top_journal_count::<&str>(&pubs, &[]), 0);
    }

    #[test]
    fn test_oldest_year_unknown() {
        assert_eq!(oldest_year(&[publication("X", None)]), None);
        assert_eq!(oldest_year(&[]), None);
    }
}
