//! Read-only view of a blockchain node.

use alloy::primitives::TxHash;
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::types::{BlockchainResult, ReceiptLookup, TransactionLookup};

/// Source of transaction and receipt data.
///
/// Implementations are shared between concurrent waits and must tolerate
/// parallel queries. `Ok(None)` means the node does not know the hash;
/// transport failures and timeouts are `Err`.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Look a transaction up by hash.
    async fn transaction_by_hash(&self, hash: TxHash) -> BlockchainResult<Option<TransactionLookup>>;

    /// Fetch the execution receipt of a transaction.
    async fn transaction_receipt(&self, hash: TxHash) -> BlockchainResult<Option<ReceiptLookup>>;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for Arc<T> {
    async fn transaction_by_hash(&self, hash: TxHash) -> BlockchainResult<Option<TransactionLookup>> {
        (**self).transaction_by_hash(hash).await
    }

    async fn transaction_receipt(&self, hash: TxHash) -> BlockchainResult<Option<ReceiptLookup>> {
        (**self).transaction_receipt(hash).await
    }
}
