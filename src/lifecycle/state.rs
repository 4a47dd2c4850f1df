//! Lifecycle states of an on-chain operation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an operation stands on chain.
///
/// ```text
/// Pending ──▶ Broadcast ──▶ Complete
///                      └──▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// No hash yet, or the node has not seen the transaction.
    Pending,
    /// Known to the node but not confirmed by a receipt.
    Broadcast,
    /// Included with a successful receipt.
    Complete,
    /// Included with an unsuccessful receipt.
    Failed,
}

impl LifecycleState {
    /// No transition happens after a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Broadcast => "broadcast",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
