//! Transaction signing.
//!
//! # Security
//! - Private keys are loaded ONLY from arguments or environment variables
//! - Keys are never logged or serialized

use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::hex;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, TxHash, TxKind, U256};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::payload::StructuredTransaction;

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "CHAIN_OPS_PRIVATE_KEY";

/// A signed transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// EIP-2718 encoded transaction, `0x`-prefixed hex.
    pub raw: String,
    /// Hash the transaction will have on chain.
    pub hash: TxHash,
}

/// Something able to sign a decoded unsigned payload.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Address the signatures recover to.
    fn address(&self) -> Address;

    /// Sign the transaction.
    async fn sign(&self, tx: &StructuredTransaction) -> BlockchainResult<SignedTransaction>;
}

/// Signer backed by an in-process private key.
#[derive(Debug, Clone)]
pub struct LocalSigner {
    signer: PrivateKeySigner,
}

impl LocalSigner {
    /// Create a signer from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Signer(format!("Invalid private key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Signer initialized");

        Ok(Self { signer })
    }

    /// Load the key from `CHAIN_OPS_PRIVATE_KEY`.
    pub fn from_env() -> BlockchainResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            BlockchainError::Signer(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key)
    }
}

#[async_trait]
impl TransactionSigner for LocalSigner {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn sign(&self, tx: &StructuredTransaction) -> BlockchainResult<SignedTransaction> {
        let mut unsigned = to_eip1559(tx)?;

        let signature = self
            .signer
            .sign_transaction_sync(&mut unsigned)
            .map_err(|e| BlockchainError::Signer(format!("Signing failed: {}", e)))?;

        let signed = unsigned.into_signed(signature);
        let hash = *signed.hash();
        let envelope = TxEnvelope::from(signed);

        Ok(SignedTransaction {
            raw: hex::encode_prefixed(envelope.encoded_2718()),
            hash,
        })
    }
}

/// Build the EIP-1559 signing input from decoded fields.
pub fn to_eip1559(tx: &StructuredTransaction) -> BlockchainResult<TxEip1559> {
    Ok(TxEip1559 {
        chain_id: narrow(tx.chain_id, "chainId")?,
        nonce: narrow(tx.nonce, "nonce")?,
        gas_limit: narrow(tx.gas_limit, "gas")?,
        max_fee_per_gas: narrow(tx.max_fee_per_gas, "maxFeePerGas")?,
        max_priority_fee_per_gas: narrow(tx.max_priority_fee_per_gas, "maxPriorityFeePerGas")?,
        to: TxKind::Call(tx.to),
        value: tx.value,
        access_list: Default::default(),
        input: tx.data.clone(),
    })
}

fn narrow<T: TryFrom<U256>>(value: U256, field: &str) -> BlockchainResult<T> {
    T::try_from(value).map_err(|_| {
        BlockchainError::Signer(format!("{} value {} is out of range", field, value))
    })
}
