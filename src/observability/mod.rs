//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: operation_id, tx_hash, state)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr, filtered)
//!     → any `metrics` recorder the host application installs
//! ```

pub mod logging;
pub mod metrics;
