//! Records extracted from scholar pages and the tables derived from them.

mod profile;
mod publication;
mod series;

pub use profile::{CoauthorEdge, CoauthorLink, ScholarProfile};
pub use publication::{Publication, PublicationDetail, PublicationQuery, PublicationSort};
pub use series::{
    ArticleCitationHistory, AuthorPosition, CareerPoint, CitationYearCount, PredictionPoint,
    ScholarYearTotal, VenueMetric,
};
