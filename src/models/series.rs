//! Citation time series and the derived tables built from them.

use serde::{Deserialize, Serialize};

/// Citations received in one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationYearCount {
    pub year: i32,
    pub cites: u64,
}

impl CitationYearCount {
    pub fn new(year: i32, cites: u64) -> Self {
        Self { year, cites }
    }
}

/// Yearly citation history of one article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleCitationHistory {
    /// Publication id the history belongs to
    pub pubid: String,

    /// Contiguous, ascending yearly counts
    pub series: Vec<CitationYearCount>,
}

/// Citations summed by publication year for one scholar, with a running total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarYearTotal {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub cites: u64,
    /// Cumulative cites up to and including `year`
    pub total: u64,
}

/// One year of a scholar's citation career curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerPoint {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub cites: u64,
    /// `year` minus the scholar's first observed year, when alignment was requested
    pub career_year: Option<i32>,
}

/// Projected h-index `years_ahead` years from now
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub years_ahead: u32,
    pub h_index: f64,
}

/// Where an author sits within one publication's author list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorPosition {
    /// The author string as given
    pub authors: String,

    /// 1-based position, when exactly one author matched
    pub position: Option<usize>,

    /// Number of authors, unless the list was truncated
    pub n_authors: Option<usize>,

    /// 0.0 for first author through 1.0 for last
    pub position_normalized: Option<f64>,
}

/// A per-venue metric that may be unknown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueMetric {
    pub venue: String,
    pub value: Option<f64>,
}
