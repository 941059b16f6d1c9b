//! Analyses built on top of the scholar client.
//!
//! Each submodule keeps its arithmetic in plain functions over already
//! extracted records and adds thin `ScholarClient` methods that fetch what
//! the arithmetic needs.

pub mod compare;
pub mod metrics;
pub mod position;
pub mod predict;
pub mod venues;

pub use compare::{career_points, yearly_citation_totals};
pub use position::{author_position, author_positions};
pub use predict::{predict, ImpactFeatures, ACUNA_COEFFICIENTS};
pub use venues::{impact_factors, journal_ranks};
