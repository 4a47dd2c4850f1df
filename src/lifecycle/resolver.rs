//! Status resolution against a data source.
//!
//! # State Derivation
//! ```text
//! no hash                               → Pending   (no query)
//! transaction unknown                   → Pending   (propagation delay)
//! transaction without block reference   → Broadcast
//! block reference, receipt missing      → Broadcast (warned + counted)
//! receipt success                       → Complete
//! receipt unsuccessful                  → Failed
//! ```
//!
//! Data source errors are returned as errors, never folded into a state.

use alloy::primitives::TxHash;
use std::sync::Arc;

use crate::blockchain::{BlockchainResult, DataSource};
use crate::lifecycle::state::LifecycleState;
use crate::observability::metrics;

/// Derives lifecycle states from a shared data source.
pub struct StatusResolver<D> {
    source: Arc<D>,
}

impl<D> Clone for StatusResolver<D> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<D: DataSource> StatusResolver<D> {
    pub fn new(source: Arc<D>) -> Self {
        Self { source }
    }

    /// The shared data source.
    pub fn source(&self) -> &Arc<D> {
        &self.source
    }

    /// Resolve the state of the transaction with the given hash.
    pub async fn resolve(&self, hash: Option<TxHash>) -> BlockchainResult<LifecycleState> {
        let state = self.derive(hash).await?;
        metrics::record_status_resolution(state.as_str());
        Ok(state)
    }

    async fn derive(&self, hash: Option<TxHash>) -> BlockchainResult<LifecycleState> {
        let Some(hash) = hash else {
            return Ok(LifecycleState::Pending);
        };

        let Some(tx) = self.source.transaction_by_hash(hash).await? else {
            tracing::debug!(tx_hash = %hash, "Transaction not yet visible to node");
            return Ok(LifecycleState::Pending);
        };

        if !tx.has_block_reference() {
            return Ok(LifecycleState::Broadcast);
        }

        match self.source.transaction_receipt(hash).await? {
            Some(receipt) if receipt.success => Ok(LifecycleState::Complete),
            Some(_) => Ok(LifecycleState::Failed),
            None => {
                // Usually a race between block inclusion and receipt indexing,
                // but a node that never serves the receipt looks the same.
                tracing::warn!(
                    tx_hash = %hash,
                    block_number = ?tx.block_number,
                    "Transaction has a block reference but no receipt"
                );
                metrics::record_receipt_missing();
                Ok(LifecycleState::Broadcast)
            }
        }
    }
}
