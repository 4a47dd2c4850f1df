//! Operation lifecycle engine.
//!
//! # Data Flow
//! ```text
//! OperationRecord.transaction_hash
//!     → resolver.rs (data source → LifecycleState)
//!     → wait.rs (repeat every interval until terminal or timeout)
//!     → tracker.rs (facade: resolve, wait, display amount, describe)
//! ```
//!
//! # Design Decisions
//! - States are derived on every call, never stored on the record
//! - Data source errors stay errors; they never become a state
//! - Time is injected (Clock + Sleeper) so waits are testable without real delays
//! - A wait never mutates the record it observes

pub mod error;
pub mod resolver;
pub mod retry;
pub mod state;
pub mod tracker;
pub mod wait;

pub use error::{LifecycleError, LifecycleResult};
pub use resolver::StatusResolver;
pub use retry::RetryPolicy;
pub use state::LifecycleState;
pub use tracker::{OperationTracker, OperationTrackerBuilder};
pub use wait::{Clock, Sleeper, TokioClock, TokioSleeper, WaitCoordinator, DEFAULT_INTERVAL, DEFAULT_TIMEOUT};
