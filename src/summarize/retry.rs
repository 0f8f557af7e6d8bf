//! Retry policy for upstream LLM calls.

use crate::error::NotatError;
use std::time::Duration;

/// Bounded retry with linear backoff, keyed by attempt number.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Backoff unit; the wait after failed attempt `k` is `k * backoff_unit`.
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            // At least one attempt, or nothing would ever be sent.
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    /// Wait before the attempt that follows failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_unit * attempt
    }

    /// Whether `error` should consume a retry rather than abort immediately.
    pub fn is_retryable(&self, error: &NotatError) -> bool {
        error.is_retryable()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}
