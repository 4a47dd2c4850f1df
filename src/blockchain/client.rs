//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint
//! - Query chain state (chain id, block number, transactions, receipts)
//! - Handle timeouts and network errors gracefully
//! - Serve as the production `DataSource` for status resolution

use alloy::primitives::TxHash;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Transaction, TransactionReceipt};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::source::DataSource;
use crate::blockchain::types::{
    BlockchainConfig, BlockchainError, BlockchainResult, ChainId, ReceiptLookup, TransactionLookup,
};
use crate::observability::metrics;

/// Blockchain RPC client wrapper with failover support.
///
/// Cloning is cheap; clones share the underlying providers.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// An unreachable node does not fail construction. An unparseable
    /// primary URL or a node serving another chain does.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        // 1. Add primary provider
        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as Arc<dyn Provider + Send + Sync>);

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e @ BlockchainError::ChainMismatch { .. }) => return Err(e),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but node is unreachable"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        let mut timeouts = 0;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    timeouts += 1;
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(self.exhausted("get_chain_id", timeouts))
    }

    /// Get a transaction by hash. `None` when the node does not know it.
    pub async fn get_transaction_by_hash(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<Transaction>> {
        let mut timeouts = 0;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_by_hash(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => {
                    timeouts += 1;
                    tracing::warn!(provider_idx = i, "RPC timeout");
                }
            }
        }
        Err(self.exhausted("get_transaction_by_hash", timeouts))
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        let mut timeouts = 0;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_receipt(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => {
                    timeouts += 1;
                    tracing::warn!(provider_idx = i, "RPC timeout");
                }
            }
        }
        Err(self.exhausted("get_transaction_receipt", timeouts))
    }

    /// Error for a call that no provider could answer. Timeouts are reported
    /// as such only when every provider timed out.
    fn exhausted(&self, method: &'static str, timeouts: usize) -> BlockchainError {
        metrics::record_rpc_failure(method);
        if timeouts == self.providers.len() {
            BlockchainError::Timeout(self.config.rpc_timeout_secs)
        } else {
            BlockchainError::Rpc(format!("All RPC providers failed: {}", method))
        }
    }
}

#[async_trait]
impl DataSource for BlockchainClient {
    async fn transaction_by_hash(&self, hash: TxHash) -> BlockchainResult<Option<TransactionLookup>> {
        let tx = self.get_transaction_by_hash(hash).await?;
        Ok(tx.map(|tx| TransactionLookup {
            block_number: tx.block_number,
            block_hash: tx.block_hash,
        }))
    }

    async fn transaction_receipt(&self, hash: TxHash) -> BlockchainResult<Option<ReceiptLookup>> {
        let receipt = self.get_transaction_receipt(hash).await?;
        Ok(receipt.map(|r| ReceiptLookup {
            success: r.status(),
            block_number: r.block_number,
        }))
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .field("providers", &self.providers.len())
            .finish()
    }
}
