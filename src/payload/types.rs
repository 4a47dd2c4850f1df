//! Decoded transaction and decoding errors.

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding an unsigned payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// Hex string has odd length or non-hex characters.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Decoded bytes are not UTF-8 JSON.
    #[error("invalid payload encoding: {0}")]
    InvalidPayloadEncoding(String),

    /// JSON is valid but a required field is missing or mistyped.
    #[error("invalid payload schema: {0}")]
    InvalidPayloadSchema(String),
}

/// Result type for payload decoding.
pub type PayloadResult<T> = Result<T, PayloadError>;

/// Structured EIP-1559 transaction parsed from an unsigned payload.
///
/// Every numeric field is a `U256`: gas and value fields routinely exceed
/// what a double can represent exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredTransaction {
    pub chain_id: U256,
    pub nonce: U256,
    pub max_priority_fee_per_gas: U256,
    pub max_fee_per_gas: U256,
    pub gas_limit: U256,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}
