//! Fixed-delay retry for page fetches.
//!
//! Attempts run strictly one after another with the same pause between
//! them. Only unexpected status codes are retried: a 429 ends the call at
//! once with [`ScholarError::RateLimited`], and exhausting the attempt budget
//! yields [`ScholarError::Unreachable`].

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::scholar::ScholarError;

/// Bounded, sequential retry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (never less than 1)
    pub max_attempts: u32,
    /// Pause between consecutive attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A single attempt, no retries
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1))
    }
}

/// Why a single attempt produced no page
#[derive(Debug)]
pub enum AttemptError {
    /// Non-success status worth another attempt
    Status(u16),
    /// Stop immediately with this error
    Fatal(ScholarError),
}

impl From<ScholarError> for AttemptError {
    fn from(err: ScholarError) -> Self {
        AttemptError::Fatal(err)
    }
}

/// Run `operation` until it succeeds, fails fatally, or the policy's attempts run out.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, ScholarError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(
                        "Fetch succeeded on attempt {} after {} failed attempts",
                        attempt,
                        attempt - 1
                    );
                }
                return Ok(result);
            }
            Err(AttemptError::Fatal(error)) => return Err(error),
            Err(AttemptError::Status(status)) => {
                if attempt >= policy.max_attempts {
                    tracing::warn!(
                        "Giving up after {} attempts, last status {}",
                        attempt,
                        status
                    );
                    return Err(ScholarError::Unreachable {
                        status,
                        attempts: attempt,
                    });
                }

                tracing::debug!(
                    "HTTP {} on attempt {}/{}, retrying in {:?}",
                    status,
                    attempt,
                    policy.max_attempts,
                    policy.delay
                );
                sleep(policy.delay).await;
            }
        }
    }
}
