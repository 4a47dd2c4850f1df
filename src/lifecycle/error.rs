//! Lifecycle engine errors.

use std::time::Duration;
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::payload::PayloadError;

/// Errors surfaced by status resolution and waiting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// The data source failed; never mapped to a lifecycle state.
    #[error("data source error: {0}")]
    DataSource(#[from] BlockchainError),

    /// No terminal state observed before the deadline. The outcome is
    /// unknown; poll again later.
    #[error("operation {operation_id} did not reach a terminal state within {elapsed:?}")]
    OperationTimeout {
        operation_id: String,
        elapsed: Duration,
    },

    /// A component was built without a required handle.
    #[error("missing dependency: {0}")]
    MissingDependency(&'static str),
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
