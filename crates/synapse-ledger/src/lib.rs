//! Deterministic ledger modules for the Synapse BCI platform
//!
//! This crate implements the platform's state-transition core: four ledger
//! modules behind a shared authorization, allocation, and composition layer.
//!
//! # Architecture
//!
//! - **Call context**: caller identity and logical clock, resolved by the
//!   embedding environment and passed explicitly to every entry point
//! - **Ledgers**: marketplace, data storage, training, and reward token,
//!   each owning its own tables
//! - **Platform**: the composition root that wires cross-module operations
//!   (a purchase moves tokens and records ownership in one atomic step)
//!
//! Every entry point validates authorization and state invariants before the
//! first table write, so a failed call leaves no observable mutation.

pub mod allocator;
pub mod context;
pub mod data_storage;
pub mod marketplace;
pub mod platform;
pub mod token;
pub mod training;

// Re-exports
pub use allocator::IdAllocator;
pub use context::CallContext;
pub use data_storage::{DataRecord, DataStorageLedger};
pub use marketplace::{Application, MarketplaceLedger, UserApplication};
pub use platform::{Platform, PlatformConfig};
pub use token::RewardTokenLedger;
pub use training::{EnrollmentState, TrainingLedger, TrainingProgram, UserProgram};

// Core type re-exports
pub use synapse_core::{
    ApplicationId, DataDigest, LedgerError, Principal, ProgramId, RecordId, Result, Timestamp,
};
