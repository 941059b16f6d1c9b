//! Rebuilding gap-free yearly citation series.
//!
//! Profile pages draw the yearly citation histogram as stacked bars. Years
//! with zero citations get a bar without a value label, so the list of
//! labels can be shorter than the list of years. Each bar's inline
//! `z-index` is its position counted from the most recent year backwards
//! (1 = newest), which is enough to put the labelled values back in place.

use std::collections::BTreeMap;

use crate::models::CitationYearCount;

/// One histogram bar as found on the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StackedBar {
    /// 1-based position from the newest year, from the inline `z-index`
    pub z_index: Option<usize>,
    /// Labelled value, absent for zero-citation years
    pub value: Option<u64>,
}

/// Pair histogram years with their values.
///
/// When every year has a label, `labels` is used as is. Otherwise the
/// values are placed by each bar's z-index and unplaced years are zero.
/// The series is cut to the shorter of years and values, then any gaps
/// between its first and last year are filled with zeros.
pub fn reconstruct_histogram(
    years: &[i32],
    labels: &[u64],
    bars: &[StackedBar],
) -> Vec<CitationYearCount> {
    let values: Vec<u64> = if years.len() > labels.len() {
        tracing::debug!(
            "{} years but {} labels, placing values by stacking order",
            years.len(),
            labels.len()
        );
        let mut by_recency = vec![0; years.len()];
        for bar in bars {
            if let (Some(z), Some(value)) = (bar.z_index, bar.value) {
                if (1..=by_recency.len()).contains(&z) {
                    by_recency[z - 1] = value;
                }
            }
        }
        by_recency.reverse();
        by_recency
    } else {
        labels.to_vec()
    };

    let samples: Vec<(i32, u64)> = years.iter().copied().zip(values).collect();
    fill_year_gaps(&samples)
}

/// Expand `(year, cites)` samples to every year from the first to the last.
///
/// Years without a sample get zero. If a year is sampled twice the later
/// sample wins. The result is strictly ascending by year.
pub fn fill_year_gaps(samples: &[(i32, u64)]) -> Vec<CitationYearCount> {
    let by_year: BTreeMap<i32, u64> = samples.iter().copied().collect();

    let (Some(&first), Some(&last)) = (by_year.keys().next(), by_year.keys().next_back()) else {
        return Vec::new();
    };

    (first..=last)
        .map(|year| CitationYearCount::new(year, by_year.get(&year).copied().unwrap_or(0)))
        .collect()
}
