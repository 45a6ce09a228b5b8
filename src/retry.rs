//! Bounded retry with a fixed inter-attempt delay
//!
//! The policy the dashboard has always used: up to 3 attempts, 1 second
//! apart, no jitter, no backoff. The loop operates purely on the returned
//! [`FetchError`], never on unwinding.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Policy for tests and latency-sensitive callers: no waiting.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
        }
    }
}

/// Run `operation` until it succeeds, a non-retryable error occurs, or the
/// attempt budget is spent. Returns the outcome together with the number
/// of attempts consumed.
pub async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> (Result<T, FetchError>, u32)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return (Ok(value), attempt),
            Err(err) if err.is_retryable() && attempt < policy.max_attempts => {
                tracing::warn!(
                    "attempt {} of {} failed: {}",
                    attempt,
                    policy.max_attempts,
                    err
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(err) => return (Err(err), attempt),
        }
    }
}
