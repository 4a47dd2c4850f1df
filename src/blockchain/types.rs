//! Chain-specific types and error definitions.

use alloy::primitives::{TxHash, B256};
use std::str::FromStr;
use thiserror::Error;

pub use crate::config::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

/// Errors that can occur while talking to the chain or signing for it.
///
/// A lookup that finds nothing is not an error: data source methods return
/// `Ok(None)` for that case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Invalid private key, unsignable transaction or signing failure.
    #[error("Signer error: {0}")]
    Signer(String),

    /// A transaction hash that is not 32 bytes of hex.
    #[error("Invalid transaction hash '{0}'")]
    InvalidHash(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Parse a `0x`-prefixed (or bare) 32-byte transaction hash.
pub fn parse_tx_hash(raw: &str) -> BlockchainResult<TxHash> {
    TxHash::from_str(raw.trim()).map_err(|_| BlockchainError::InvalidHash(raw.to_string()))
}

/// What a node reports about a transaction it knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionLookup {
    /// Number of the including block, if mined.
    pub block_number: Option<u64>,
    /// Hash of the including block, if mined.
    pub block_hash: Option<B256>,
}

impl TransactionLookup {
    /// Seen in the mempool only.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Included in the given block.
    pub fn mined(block_number: u64) -> Self {
        Self {
            block_number: Some(block_number),
            block_hash: None,
        }
    }

    /// True once the node references a confirming block.
    pub fn has_block_reference(&self) -> bool {
        self.block_number.is_some() || self.block_hash.is_some()
    }
}

/// Execution receipt summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptLookup {
    /// Execution status flag of the receipt.
    pub success: bool,
    /// Block the receipt belongs to.
    pub block_number: Option<u64>,
}
