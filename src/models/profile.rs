//! Scholar profile and coauthor models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scholar's profile page, as extracted from `citations?user=<id>`.
///
/// Every field the page may omit is defaulted rather than failing: empty
/// strings, zero counts, `None` for the optional values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScholarProfile {
    /// Canonical scholar identifier (see [`crate::utils::tidy_id`])
    pub id: String,

    /// Display name
    pub name: String,

    /// First line of the bio block
    pub affiliation: String,

    /// Total citations across all years
    pub total_cites: u64,

    /// h-index over all years
    pub h_index: u64,

    /// i10-index over all years
    pub i10_index: u64,

    /// Research-interest tags
    pub fields: Vec<String>,

    /// Personal homepage, if linked
    pub homepage: Option<String>,

    /// Coauthors listed in the profile sidebar
    pub coauthors: Vec<CoauthorLink>,

    /// Public-access counter: articles available
    pub available: Option<u64>,

    /// Public-access counter: articles not available
    pub not_available: Option<u64>,
}

impl ScholarProfile {
    /// Create an empty profile for the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

impl fmt::Display for ScholarProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name:        {}", self.name)?;
        writeln!(f, "Affiliation: {}", self.affiliation)?;
        writeln!(f, "Scholar ID:  {}", self.id)?;
        writeln!(f, "Total cites: {}", self.total_cites)?;
        writeln!(f, "h-index:     {}", self.h_index)?;
        writeln!(f, "i10-index:   {}", self.i10_index)?;
        writeln!(f, "Fields:      {}", self.fields.join(", "))?;
        writeln!(
            f,
            "Homepage:    {}",
            self.homepage.as_deref().unwrap_or_default()
        )?;
        write!(f, "Coauthors:   {}", self.coauthors.len())
    }
}

/// A coauthor link as it appears on a profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoauthorLink {
    /// Display name as shown
    pub name: String,

    /// Link target, absolute when the page gave a site-relative path
    pub url: String,

    /// Scholar identifier, if the link carries a `user=` parameter
    pub id: Option<String>,
}

/// One author → coauthor edge of a coauthor network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoauthorEdge {
    /// Profile owner, title-cased
    pub author: String,

    /// Coauthor, title-cased
    pub coauthor: String,

    /// Coauthor identifier, when derivable from the link
    pub coauthor_id: Option<String>,
}
