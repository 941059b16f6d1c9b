//! Venue-level metrics.
//!
//! Impact factors and journal rankings come from licensed datasets that are
//! not shipped with the crate. Both lookups answer every venue with an
//! unknown value and say so in a warning.

use crate::models::VenueMetric;
use crate::scholar::{Outcome, ScholarWarning};

fn unknown_for<S: AsRef<str>>(venues: &[S], metric: &str) -> Outcome<Vec<VenueMetric>> {
    let rows = venues
        .iter()
        .map(|venue| VenueMetric {
            venue: venue.as_ref().to_string(),
            value: None,
        })
        .collect();

    Outcome::new(rows).with_warning(ScholarWarning::DataUnavailable(format!(
        "no {} dataset available; all values are unknown",
        metric
    )))
}

/// Impact factor of each venue
pub fn impact_factors<S: AsRef<str>>(venues: &[S]) -> Outcome<Vec<VenueMetric>> {
    unknown_for(venues, "impact factor")
}

/// Rank of each venue
pub fn journal_ranks<S: AsRef<str>>(venues: &[S]) -> Outcome<Vec<VenueMetric>> {
    unknown_for(venues, "journal ranking")
}
