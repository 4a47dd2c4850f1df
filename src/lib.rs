//! Lifecycle tracking for signed on-chain operations.

pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod operation;
pub mod payload;

pub use blockchain::{BlockchainClient, DataSource, LocalSigner, TransactionSigner};
pub use config::EngineConfig;
pub use lifecycle::{LifecycleError, LifecycleState, OperationTracker, OperationTrackerBuilder};
pub use operation::{OperationKind, OperationModel, OperationRecord, StakingOperation, Trade, Transfer};
