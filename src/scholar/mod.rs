//! Fetching and extracting scholar pages.
//!
//! Everything here goes through a [`Transport`], the single seam between the
//! crate and the network. [`ScholarClient`] builds the page URLs, fetches
//! them sequentially and hands the HTML to the extractors in [`extract`].
//!
//! # Error model
//!
//! Fatal conditions are [`ScholarError`]s and abort the call. Everything else
//! degrades: extractors default missing fields, and operations that had to
//! guess or came back empty return an [`Outcome`] carrying
//! [`ScholarWarning`]s next to a best-effort value.

mod client;
mod coauthors;
pub mod extract;
pub mod mock;
mod pagination;
pub mod reconstruct;

pub use client::{ScholarClient, MAX_AUTHOR_LOOKUPS};
pub use mock::MockTransport;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Fetches a page body by URL.
///
/// Implementations own retry and rate-limit detection; callers treat every
/// error as final for the request.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// GET `url` and return the body of a 200 response
    async fn get(&self, url: &str) -> Result<String, ScholarError>;
}

/// Errors that abort a scholar operation
#[derive(Debug, thiserror::Error)]
pub enum ScholarError {
    /// HTTP 429; never retried, the caller has to back off
    #[error("Rate limited (HTTP 429); wait a few minutes before retrying")]
    RateLimited,

    /// Retries exhausted on non-success responses
    #[error("Cannot reach the scholar site (HTTP {status} after {attempts} attempts); is the ID correct?")]
    Unreachable { status: u16, attempts: u32 },

    /// Request could not be sent or its body read
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid arguments from the caller
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScholarError {
    /// Whether the error leaves the rest of a multi-request operation worth continuing
    pub fn is_skippable(&self) -> bool {
        matches!(self, ScholarError::Unreachable { .. } | ScholarError::Network(_))
    }
}

/// Non-fatal conditions reported next to a best-effort result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ScholarWarning {
    /// A well-formed page had nothing matching
    EmptyResult(String),
    /// Several candidates matched and one was picked heuristically
    AmbiguousResult(String),
    /// The h-index projection fell outside what the model was calibrated for
    ModelUnreliable(String),
    /// A requested page size exceeded the service maximum
    PageSizeCapped { requested: usize, used: usize },
    /// No dataset backs the requested metric
    DataUnavailable(String),
}

impl fmt::Display for ScholarWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScholarWarning::EmptyResult(msg) => write!(f, "no result: {}", msg),
            ScholarWarning::AmbiguousResult(msg) => write!(f, "ambiguous: {}", msg),
            ScholarWarning::ModelUnreliable(msg) => write!(f, "model unreliable: {}", msg),
            ScholarWarning::PageSizeCapped { requested, used } => {
                write!(f, "page size {} exceeds the maximum; using {}", requested, used)
            }
            ScholarWarning::DataUnavailable(msg) => write!(f, "data unavailable: {}", msg),
        }
    }
}

/// A result together with the warnings raised while producing it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<ScholarWarning>,
}

impl<T> Outcome<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Record a warning and log it
    pub fn warn(&mut self, warning: ScholarWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Builder form of [`Outcome::warn`]
    pub fn with_warning(mut self, warning: ScholarWarning) -> Self {
        self.warn(warning);
        self
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
