//! Retry policy for data source errors during a wait.
//!
//! Disabled by default: a data source error aborts the wait and the caller
//! decides whether to wait again.

use rand::Rng;
use std::time::Duration;

use crate::config::WaitConfig;

/// How many resolver errors a wait tolerates, and how long it backs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Abort on the first error.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &WaitConfig) -> Self {
        Self {
            max_retries: config.max_error_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Exponential backoff with up to 10% jitter for the given 1-based attempt.
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let base_ms = self.base_delay.as_millis() as u64;
        let max_ms = self.max_delay.as_millis() as u64;
        let delay_ms = base_ms.saturating_mul(2u64.saturating_pow(attempt - 1));
        let capped_delay = delay_ms.min(max_ms);

        let jitter_range = capped_delay / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(capped_delay + jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}
