//! Operation record errors.

use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::payload::PayloadError;

/// Errors raised while building or updating an operation record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// The server snapshot is unusable; raised at construction.
    #[error("invalid operation record: {0}")]
    InvalidRecord(String),

    /// A set-once field already holds a different value.
    #[error("{field} already set on operation {operation_id}")]
    FieldAlreadySet {
        field: &'static str,
        operation_id: String,
    },

    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// Signing failed or produced an unusable hash.
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

/// Result type for record operations.
pub type OperationResult<T> = Result<T, OperationError>;
