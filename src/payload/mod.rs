//! Unsigned payload subsystem.
//!
//! # Data Flow
//! ```text
//! OperationRecord.unsigned_payload (hex)
//!     → codec.rs (hex → UTF-8 → JSON → typed fields)
//!     → StructuredTransaction (cached on the record)
//!     → signer (EIP-1559 signing input)
//! ```
//!
//! # Design Decisions
//! - Decoding is pure and deterministic; callers may cache the result
//! - Three distinct error kinds: bad hex, bad JSON, bad schema
//! - Encoding signed transactions belongs to the signer, not this module

pub mod codec;
pub mod types;

pub use codec::{decode, PayloadShape};
pub use types::{PayloadError, PayloadResult, StructuredTransaction};
