use crate::client::{ApiError, ClientConfig};
use std::time::Duration;

/// Internal decision for how to proceed after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Retry { delay: Duration },
    Fail,
}

/// Retry policy shared by every request method.
///
/// Important constraints:
/// - Deterministic: exponential backoff without jitter.
/// - The only input from an attempt is its classified error.
#[derive(Debug, Clone)]
pub(crate) struct RetryPolicy {
    pub enabled: bool,
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            enabled: config.retry_enabled,
            max_retries: config.max_retries,
            base_delay: config.retry_base_delay,
        }
    }

    /// `base_delay * 2^attempt`, saturating.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Decide what to do next after an attempt failed.
    ///
    /// `attempt` is 0-based (first failure => attempt=0).
    pub fn decide(&self, err: &ApiError, attempt: u32) -> Decision {
        if !self.enabled || attempt >= self.max_retries || !err.retryable {
            return Decision::Fail;
        }
        Decision::Retry {
            delay: self.backoff_delay(attempt),
        }
    }
}
