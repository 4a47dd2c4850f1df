//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, interval below deadline)
//! - Detect duplicate network entries
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EngineConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::EngineConfig;

/// Largest power of ten that fits in a U256 is 10^77.
const MAX_NATIVE_DECIMALS: u8 = 77;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("blockchain.rpc_url is empty")]
    EmptyRpcUrl,

    #[error("invalid RPC URL '{url}': {reason}")]
    InvalidRpcUrl { url: String, reason: String },

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("wait.interval_ms ({interval_ms}) must be below wait.timeout_secs ({timeout_secs}s)")]
    IntervalExceedsTimeout { interval_ms: u64, timeout_secs: u64 },

    #[error("duplicate network '{0}'")]
    DuplicateNetwork(String),

    #[error("network '{network}' has {decimals} native decimals (max 77)")]
    TooManyDecimals { network: String, decimals: u8 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &EngineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let chain = &config.blockchain;
    if chain.rpc_url.trim().is_empty() {
        errors.push(ValidationError::EmptyRpcUrl);
    } else {
        for url in std::iter::once(&chain.rpc_url).chain(chain.failover_urls.iter()) {
            if let Err(e) = url::Url::parse(url) {
                errors.push(ValidationError::InvalidRpcUrl {
                    url: url.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("blockchain.rpc_timeout_secs"));
    }

    let wait = &config.wait;
    if wait.interval_ms == 0 {
        errors.push(ValidationError::ZeroValue("wait.interval_ms"));
    }
    if wait.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("wait.timeout_secs"));
    } else if wait.interval_ms >= wait.timeout_secs.saturating_mul(1000) {
        errors.push(ValidationError::IntervalExceedsTimeout {
            interval_ms: wait.interval_ms,
            timeout_secs: wait.timeout_secs,
        });
    }

    let mut seen = HashSet::new();
    for network in &config.networks {
        if !seen.insert(network.network_id.as_str()) {
            errors.push(ValidationError::DuplicateNetwork(network.network_id.clone()));
        }
        if network.native_decimals > MAX_NATIVE_DECIMALS {
            errors.push(ValidationError::TooManyDecimals {
                network: network.network_id.clone(),
                decimals: network.native_decimals,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
