//! Metrics collection.
//!
//! # Metrics
//! - `chain_ops_status_resolutions_total` (counter): resolved states by `state`
//! - `chain_ops_receipt_missing_total` (counter): block reference seen without receipt
//! - `chain_ops_wait_outcomes_total` (counter): finished waits by `outcome`
//! - `chain_ops_rpc_failures_total` (counter): calls no provider could answer, by `method`
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Label values are static strings

use metrics::counter;

/// Record the state a status resolution produced.
pub fn record_status_resolution(state: &'static str) {
    counter!("chain_ops_status_resolutions_total", "state" => state).increment(1);
}

/// Record a transaction with a block reference but no receipt yet.
pub fn record_receipt_missing() {
    counter!("chain_ops_receipt_missing_total").increment(1);
}

/// Record how a wait ended (`complete`, `failed`, `timeout`, `error`).
pub fn record_wait_outcome(outcome: &'static str) {
    counter!("chain_ops_wait_outcomes_total", "outcome" => outcome).increment(1);
}

/// Record an RPC method that failed on every provider.
pub fn record_rpc_failure(method: &'static str) {
    counter!("chain_ops_rpc_failures_total", "method" => method).increment(1);
}
