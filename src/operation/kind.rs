//! Operation kinds sharing the payload/sign/poll/wait lifecycle.
//!
//! A kind only contributes what differs between operations: a name, the
//! payload shape it carries and which states end its lifecycle.

use crate::lifecycle::LifecycleState;
use crate::payload::{PayloadShape, StructuredTransaction};

/// Capability set the lifecycle engine is parameterized over.
pub trait OperationKind: Send + Sync + 'static {
    /// Name used in summaries and logs.
    const NAME: &'static str;

    /// Decoded form of the unsigned payload.
    type Payload: PayloadShape;

    /// Whether `state` ends the lifecycle of this kind.
    fn is_terminal(state: LifecycleState) -> bool {
        state.is_terminal()
    }
}

/// Asset transfer between two addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transfer;

impl OperationKind for Transfer {
    const NAME: &'static str = "Transfer";
    type Payload = StructuredTransaction;
}

/// Asset-for-asset trade.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trade;

impl OperationKind for Trade {
    const NAME: &'static str = "Trade";
    type Payload = StructuredTransaction;
}

/// Stake, unstake or claim operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StakingOperation;

impl OperationKind for StakingOperation {
    const NAME: &'static str = "StakingOperation";
    type Payload = StructuredTransaction;
}
