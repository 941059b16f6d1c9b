//! Utility modules supporting the scholar client.
//!
//! - [`HttpClient`]: reqwest client with a persistent cookie jar and fixed headers
//! - [`HttpTransport`]: the production [`Transport`](crate::scholar::Transport)
//! - [`RetryPolicy`] and [`with_retry`]: bounded, fixed-delay retries
//! - text helpers: identifier cleanup, count parsing, name casing
//!
//! # Retry
//!
//! ```rust,no_run
//! use scholar_harvest::utils::{with_retry, AttemptError, RetryPolicy};
//!
//! # async fn example() -> Result<(), scholar_harvest::scholar::ScholarError> {
//! let page = with_retry(RetryPolicy::default(), || async {
//!     Err::<String, _>(AttemptError::Status(503))
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod retry;
mod text;

pub use http::{HttpClient, HttpTransport};
pub use retry::{with_retry, AttemptError, RetryPolicy};
pub use text::{
    absolute_url, all_ids, grab_id, leading_number, parse_count, tidy_id, title_case, to_initials,
};
