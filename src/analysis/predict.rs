//! h-index projection after Acuna, Allesina & Kording (Nature 489, 201-202, 2012).
//!
//! The model is a linear regression per horizon over
//! `[1, √n, h, y, j, q]`: publication count, current h-index, years since
//! the first publication, distinct venues and publications in top venues.
//! It was calibrated on neuroscientists; projections for other fields are
//! flagged when they turn out non-monotonic or negative.

use chrono::Datelike;

use super::metrics::{distinct_journals, oldest_year, top_journal_count};
use crate::models::{PredictionPoint, Publication};
use crate::scholar::{Outcome, ScholarClient, ScholarError, ScholarWarning};

/// Regression coefficients, one row per horizon (1 to 10 years ahead)
pub const ACUNA_COEFFICIENTS: [[f64; 6]; 10] = [
    [0.760, 0.373, 0.967, -0.069, 0.018, 0.033],
    [1.413, 0.781, 0.936, -0.132, 0.018, 0.064],
    [2.227, 1.105, 0.903, -0.193, 0.027, 0.096],
    [3.196, 1.386, 0.871, -0.274, 0.039, 0.145],
    [3.997, 1.578, 0.858, -0.345, 0.063, 0.198],
    [4.752, 1.671, 0.817, -0.377, 0.117, 0.282],
    [5.741, 1.761, 0.761, -0.420, 0.170, 0.394],
    [6.531, 1.796, 0.669, -0.420, 0.252, 0.508],
    [7.482, 1.653, 0.561, -0.415, 0.383, 0.629],
    [8.734, 1.326, 0.478, -0.411, 0.522, 0.823],
];

/// Model inputs for one scholar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactFeatures {
    /// Number of publications
    pub n: u64,
    /// Current h-index
    pub h: u64,
    /// Years since the first publication, 0 when unknown
    pub y: i64,
    /// Distinct venues
    pub j: u64,
    /// Publications in top venues
    pub q: u64,
}

impl ImpactFeatures {
    /// Derive the features from one publication listing
    pub fn from_publications<S: AsRef<str>>(
        publications: &[Publication],
        h_index: u64,
        current_year: i32,
        top_venues: &[S],
    ) -> Self {
        Self {
            n: publications.len() as u64,
            h: h_index,
            y: oldest_year(publications).map_or(0, |first| i64::from(current_year - first)),
            j: distinct_journals(publications) as u64,
            q: top_journal_count(publications, top_venues) as u64,
        }
    }

    fn vector(&self) -> [f64; 6] {
        [
            1.0,
            (self.n as f64).sqrt(),
            self.h as f64,
            self.y as f64,
            self.j as f64,
            self.q as f64,
        ]
    }
}

/// Project the h-index 0 to 10 years ahead.
///
/// Point 0 is the observed h-index itself. Decreasing or negative
/// projections are returned as computed, with a `ModelUnreliable` warning.
pub fn predict(features: &ImpactFeatures) -> Outcome<Vec<PredictionPoint>> {
    let x = features.vector();

    let mut points = vec![PredictionPoint {
        years_ahead: 0,
        h_index: features.h as f64,
    }];
    points.extend(ACUNA_COEFFICIENTS.iter().zip(1u32..).map(|(row, years_ahead)| {
        PredictionPoint {
            years_ahead,
            h_index: row.iter().zip(x.iter()).map(|(c, v)| c * v).sum(),
        }
    }));

    let mut outcome = Outcome::new(points);

    let decreasing = outcome
        .value
        .windows(2)
        .any(|w| w[1].h_index < w[0].h_index);
    if decreasing {
        outcome.warn(ScholarWarning::ModelUnreliable(
            "decreasing h-values predicted; the model was calibrated on neuroscientists".to_string(),
        ));
    }
    if outcome.value.iter().any(|p| p.h_index < 0.0) {
        outcome.warn(ScholarWarning::ModelUnreliable(
            "negative h-values predicted".to_string(),
        ));
    }

    outcome
}

impl ScholarClient {
    /// Project a scholar's h-index. `venues` overrides the configured top venues.
    pub async fn predict_h_index(
        &self,
        scholar_id: &str,
        venues: Option<&[String]>,
    ) -> Result<Outcome<Vec<PredictionPoint>>, ScholarError> {
        let publications = self.all_publications(scholar_id).await?;
        let profile = self.profile(scholar_id).await?;
        let current_year = chrono::Local::now().year();

        let features = ImpactFeatures::from_publications(
            &publications,
            profile.h_index,
            current_year,
            venues.unwrap_or(self.top_venues()),
        );
        tracing::debug!("Prediction features for {}: {:?}", scholar_id, features);

        Ok(predict(&features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(n: u64, h: u64, y: i64, j: u64, q: u64) -> ImpactFeatures {
        ImpactFeatures { n, h, y, j, q }
    }

    #[test]
    fn test_prediction_rows() {
        let outcome = predict(&features(100, 20, 10, 30, 2));
        let points = &outcome.value;

        assert_eq!(points.len(), 11);
        assert_eq!(points[0].h_index, 20.0);
        assert!((points[1].h_index - 23.746).abs() < 1e-9);
        assert!(points
            .iter()
            .enumerate()
            .all(|(i, p)| p.years_ahead as usize == i));
        assert!(!outcome.has_warnings());
    }

    #[test]
    fn test_observed_h_is_first_point() {
        for h in [0, 7, 93] {
            let outcome = predict(&features(0, h, 0, 0, 0));
            assert_eq!(outcome.value[0].h_index, h as f64);
        }
    }

    #[test]
    fn test_implausible_projection_warns() {
        let outcome = predict(&features(0, 0, 100, 0, 0));
        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome
            .warnings
            .iter()
            .all(|w| matches!(w, ScholarWarning::ModelUnreliable(_))));
    }

    #[test]
    fn test_features_from_publications() {
        let pubs = vec![
            Publication {
                journal: "Neuron".to_string(),
                year: Some(2004),
                ..Publication::default()
            },
            Publication {
                journal: "Cell".to_string(),
                year: None,
                ..Publication::default()
            },
        ];

        let f = ImpactFeatures::from_publications(&pubs, 2, 2024, &["Neuron"]);
        assert_eq!(f, features(2, 2, 20, 2, 1));

        let empty = ImpactFeatures::from_publications::<&str>(&[], 0, 2024, &[]);
        assert_eq!(empty.y, 0);
    }
}
