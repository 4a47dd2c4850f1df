//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Config (RPC URLs, chain id) / environment (private key)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → source.rs (DataSource: transaction + receipt lookups)
//!     → signer.rs (EIP-1559 signing of decoded payloads)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from arguments or environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Broadcasting is not done here

pub mod client;
pub mod signer;
pub mod source;
pub mod types;

pub use client::BlockchainClient;
pub use signer::{LocalSigner, SignedTransaction, TransactionSigner};
pub use source::DataSource;
pub use types::{
    parse_tx_hash, BlockchainConfig, BlockchainError, BlockchainResult, ChainId, ReceiptLookup, TransactionLookup,
};
