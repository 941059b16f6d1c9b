//! # Scholar Harvest
//!
//! Extract, reconstruct and analyse citation-profile data from Google
//! Scholar author pages.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`scholar`]: the client, the transport seam, page extraction, pagination
//!   and coauthor traversal
//! - [`analysis`]: scholar comparisons, h-index prediction, author position
//!   and venue metrics
//! - [`models`]: profile, publication and time-series records
//! - [`utils`]: HTTP transport, retry and text helpers
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use scholar_harvest::{Config, ScholarClient};
//!
//! # async fn example() -> Result<(), scholar_harvest::ScholarError> {
//! let client = ScholarClient::new(&Config::default())?;
//! let profile = client.profile("qj74uXkAAAAJ").await?;
//! println!("{}", profile);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod models;
pub mod scholar;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use models::{Publication, ScholarProfile};
pub use scholar::{Outcome, ScholarClient, ScholarError, ScholarWarning, Transport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
