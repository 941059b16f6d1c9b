//! Publication list rows and publication detail pages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of a scholar's publication list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    /// Publication title
    pub title: String,

    /// Free-text author string, not split into individuals
    pub author: String,

    /// Venue name (text of the details line before its first number)
    pub journal: String,

    /// Volume/issue/pages, with any trailing year removed
    pub number: String,

    /// Cumulative citation count
    pub cites: u64,

    /// Publication year, when the row shows one
    pub year: Option<i32>,

    /// Cite-list id from the citation-count link
    pub cid: String,

    /// Per-scholar publication id used by detail pages
    pub pubid: String,
}

/// Sort order of a publication listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationSort {
    /// Most cited first
    #[default]
    Citation,
    /// Newest first
    Year,
}

impl PublicationSort {
    /// Extra query fragment to append to a listing URL
    pub fn query_fragment(&self) -> &'static str {
        match self {
            PublicationSort::Citation => "",
            PublicationSort::Year => "&sortby=pubdate",
        }
    }
}

impl fmt::Display for PublicationSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicationSort::Citation => write!(f, "citation"),
            PublicationSort::Year => write!(f, "year"),
        }
    }
}

impl FromStr for PublicationSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "citation" | "cites" => Ok(PublicationSort::Citation),
            "year" | "pubdate" => Ok(PublicationSort::Year),
            other => Err(format!("sort must be 'citation' or 'year', got '{}'", other)),
        }
    }
}

/// Parameters of a paginated publication listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicationQuery {
    /// Offset of the first row to request
    pub start: usize,

    /// Stop paging once the next offset reaches this value
    pub stop: Option<usize>,

    /// Rows per page (capped at [`PublicationQuery::MAX_PAGE_SIZE`])
    pub page_size: usize,

    /// Listing order
    pub sort: PublicationSort,
}

impl PublicationQuery {
    /// Largest page size the service honours
    pub const MAX_PAGE_SIZE: usize = 100;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn sort(mut self, sort: PublicationSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn stop(mut self, stop: usize) -> Self {
        self.stop = Some(stop);
        self
    }
}

impl Default for PublicationQuery {
    fn default() -> Self {
        Self {
            start: 0,
            stop: None,
            page_size: Self::MAX_PAGE_SIZE,
            sort: PublicationSort::Citation,
        }
    }
}

/// Metadata from a single publication's detail page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationDetail {
    /// Label/value pairs in page order
    pub fields: Vec<(String, String)>,

    /// Abstract text, empty when absent
    pub r#abstract: String,

    /// Link to the full publication, empty when absent
    pub url: String,
}

impl PublicationDetail {
    /// Look up a field by exact label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value.as_str())
    }

    /// Value of the first field whose label mentions "publication date"
    pub fn publication_date(&self) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name.to_lowercase().contains("publication date"))
            .map(|(_, value)| value.as_str())
            .unwrap_or_default()
    }

    /// The author string (first field on the page)
    pub fn authors(&self) -> &str {
        self.fields
            .first()
            .map(|(_, value)| value.as_str())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parsing() {
        assert_eq!("citation".parse::<PublicationSort>(), Ok(PublicationSort::Citation));
        assert_eq!("YEAR".parse::<PublicationSort>(), Ok(PublicationSort::Year));
        assert!("title".parse::<PublicationSort>().is_err());
        assert_eq!(PublicationSort::Year.query_fragment(), "&sortby=pubdate");
        assert_eq!(PublicationSort::Citation.query_fragment(), "");
    }

    #[test]
    fn test_query_defaults() {
        let query = PublicationQuery::new();
        assert_eq!(query.start, 0);
        assert_eq!(query.stop, None);
        assert_eq!(query.page_size, 100);
        assert_eq!(query.sort, PublicationSort::Citation);
    }

    #[test]
    fn test_detail_lookups() {
        let detail = PublicationDetail {
            fields: vec![
                ("Authors".to_string(), "A Lee, B Chen".to_string()),
                ("Publication date".to_string(), "2019/3/1".to_string()),
            ],
            ..Default::default()
        };

        assert_eq!(detail.get("Authors"), Some("A Lee, B Chen"));
        assert_eq!(detail.get("Journal"), None);
        assert_eq!(detail.publication_date(), "2019/3/1");
        assert_eq!(detail.authors(), "A Lee, B Chen");
        assert_eq!(PublicationDetail::default().publication_date(), "");
    }
}
