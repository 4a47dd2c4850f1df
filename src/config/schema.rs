//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the engine.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the lifecycle engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Blockchain data source settings.
    pub blockchain: BlockchainConfig,

    /// Polling behaviour of `wait_for_terminal`.
    pub wait: WaitConfig,

    /// Native asset table used for display-unit conversion.
    pub networks: Vec<NetworkConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            blockchain: BlockchainConfig::default(),
            wait: WaitConfig::default(),
            networks: NetworkConfig::defaults(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Blockchain data source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 84532 for base-sepolia, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 84532,
            rpc_timeout_secs: 10,
        }
    }
}

/// Wait loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Delay between two status resolutions in milliseconds.
    pub interval_ms: u64,

    /// Deadline for reaching a terminal state in seconds.
    pub timeout_secs: u64,

    /// Number of data source errors tolerated per wait (0 = abort on first).
    pub max_error_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl WaitConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval_ms: 200,
            timeout_secs: 10,
            max_error_retries: 0,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Native asset of a network.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network identifier (e.g., "base-sepolia").
    pub network_id: String,

    /// Symbol of the network-native asset (e.g., "eth").
    #[serde(default = "default_native_asset")]
    pub native_asset_id: String,

    /// Decimals of the native asset (18 for wei-denominated coins).
    #[serde(default = "default_native_decimals")]
    pub native_decimals: u8,
}

impl NetworkConfig {
    pub fn new(network_id: &str, native_asset_id: &str, native_decimals: u8) -> Self {
        Self {
            network_id: network_id.to_string(),
            native_asset_id: native_asset_id.to_string(),
            native_decimals,
        }
    }

    /// Networks known out of the box.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("base-sepolia", "eth", 18),
            Self::new("base-mainnet", "eth", 18),
            Self::new("ethereum-mainnet", "eth", 18),
            Self::new("ethereum-holesky", "eth", 18),
            Self::new("polygon-mainnet", "pol", 18),
            Self::new("arbitrum-mainnet", "eth", 18),
        ]
    }
}

fn default_native_asset() -> String {
    "eth".to_string()
}

fn default_native_decimals() -> u8 {
    18
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.wait.interval(), Duration::from_millis(200));
        assert_eq!(config.wait.timeout(), Duration::from_secs(10));
        assert_eq!(config.wait.max_error_retries, 0);
        assert_eq!(config.blockchain.rpc_timeout_secs, 10);
        assert!(config.networks.iter().any(|n| n.network_id == "base-sepolia"));
    }

    #[test]
    fn test_partial_toml() {
        let config: EngineConfig = toml::from_str(
            r#"
            [wait]
            timeout_secs = 30

            [[networks]]
            network_id = "local"
            "#,
        )
        .unwrap();

        assert_eq!(config.wait.timeout_secs, 30);
        assert_eq!(config.wait.interval_ms, 200);
        assert_eq!(config.networks, vec![NetworkConfig::new("local", "eth", 18)]);
    }
}
