//! Core vocabulary for the Synapse ledger platform
//!
//! This crate provides the foundational types shared by every ledger module:
//!
//! - **Identifiers**: principals and per-table record identifiers
//! - **Digests**: opaque fixed-width digests for off-ledger brain data
//! - **Errors**: the unified error type every entry point fails with
//!
//! Nothing here holds state or performs I/O; the crate is pure vocabulary.

pub mod digest;
pub mod errors;
pub mod identifiers;
pub mod time;

// Re-exports
pub use digest::DataDigest;
pub use errors::{LedgerError, Result};
pub use identifiers::{ApplicationId, Principal, ProgramId, RecordId};
pub use time::Timestamp;
