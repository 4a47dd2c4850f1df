//! Operation records and their kinds.
//!
//! Transfers, trades and staking operations share one record type,
//! parameterized by an [`OperationKind`].

pub mod amount;
pub mod error;
pub mod kind;
pub mod record;

pub use amount::{format_units_exact, AmountNormalizer, DisplayAmount};
pub use error::{OperationError, OperationResult};
pub use kind::{OperationKind, StakingOperation, Trade, Transfer};
pub use record::{OperationModel, OperationRecord};
