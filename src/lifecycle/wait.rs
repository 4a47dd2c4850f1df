//! Waiting for a terminal state.
//!
//! # Algorithm
//! ```text
//! start = clock.now()
//! loop:
//!     remaining = timeout - (clock.now() - start)
//!     race resolve() against sleeper.sleep(remaining)
//!         sleep first          → OperationTimeout
//!     terminal?            → return state
//!     error, retries left  → delay = backoff(n)
//!     error, none left     → return error
//!     otherwise            → delay = interval
//!     clock.now() - start >= timeout → OperationTimeout
//!     sleeper.sleep(min(delay, remaining))
//! ```
//!
//! Resolutions are sequential and never overlap. A resolution that is
//! already complete when first polled wins the race even at the deadline.
//!
//! The clock and the sleeper are injected so tests can drive a wait with a
//! manual clock and an instantaneous sleep.

use async_trait::async_trait;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::lifecycle::retry::RetryPolicy;
use crate::lifecycle::state::LifecycleState;
use crate::observability::metrics;

/// Default delay between two resolutions.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

/// Default deadline for reaching a terminal state.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Delay primitive.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Tokio's clock; honours paused time in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Polls a resolver until a terminal state or a deadline.
#[derive(Debug, Clone, Default)]
pub struct WaitCoordinator<C = TokioClock, S = TokioSleeper> {
    clock: C,
    sleeper: S,
    retry: RetryPolicy,
}

impl WaitCoordinator {
    pub fn new(retry: RetryPolicy) -> Self {
        Self::with_time(TokioClock, TokioSleeper, retry)
    }
}

impl<C: Clock, S: Sleeper> WaitCoordinator<C, S> {
    /// Coordinator with explicit time primitives.
    pub fn with_time(clock: C, sleeper: S, retry: RetryPolicy) -> Self {
        Self {
            clock,
            sleeper,
            retry,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Invoke `resolve` every `interval` until `is_terminal` accepts a state.
    ///
    /// Fails with `OperationTimeout` once `timeout` has elapsed without a
    /// terminal state, including while a resolution is still in flight.
    /// Resolver errors abort the wait unless the retry policy allows another
    /// attempt.
    pub async fn wait<F, Fut>(
        &self,
        operation_id: &str,
        is_terminal: fn(LifecycleState) -> bool,
        mut resolve: F,
        interval: Duration,
        timeout: Duration,
    ) -> LifecycleResult<LifecycleState>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = LifecycleResult<LifecycleState>>,
    {
        let start = self.clock.now();
        let mut errors = 0u32;
        let mut polls = 0u64;

        loop {
            polls += 1;
            let remaining = timeout.saturating_sub(self.clock.now().saturating_duration_since(start));
            let outcome = tokio::select! {
                biased;
                outcome = resolve() => Some(outcome),
                _ = self.sleeper.sleep(remaining) => None,
            };
            let Some(outcome) = outcome else {
                return Err(self.timed_out(operation_id, start, polls));
            };

            let delay = match outcome {
                Ok(state) if is_terminal(state) => {
                    tracing::debug!(
                        operation_id,
                        state = %state,
                        polls,
                        "Terminal state reached"
                    );
                    metrics::record_wait_outcome(state.as_str());
                    return Ok(state);
                }
                Ok(state) => {
                    tracing::trace!(operation_id, state = %state, "Waiting for terminal state");
                    interval
                }
                Err(e) if errors < self.retry.max_retries => {
                    errors += 1;
                    let delay = self.retry.backoff(errors);
                    tracing::warn!(
                        operation_id,
                        error = %e,
                        attempt = errors,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Status resolution failed, retrying"
                    );
                    delay
                }
                Err(e) => {
                    metrics::record_wait_outcome("error");
                    return Err(e);
                }
            };

            let elapsed = self.clock.now().saturating_duration_since(start);
            if elapsed >= timeout {
                return Err(self.timed_out(operation_id, start, polls));
            }

            self.sleeper.sleep(delay.min(timeout - elapsed)).await;
        }
    }

    fn timed_out(&self, operation_id: &str, start: Instant, polls: u64) -> LifecycleError {
        let elapsed = self.clock.now().saturating_duration_since(start);
        tracing::warn!(
            operation_id,
            elapsed_ms = elapsed.as_millis() as u64,
            polls,
            "Wait timed out"
        );
        metrics::record_wait_outcome("timeout");
        LifecycleError::OperationTimeout {
            operation_id: operation_id.to_string(),
            elapsed,
        }
    }
}
