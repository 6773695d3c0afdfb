//! Per-call execution context
//!
//! Replaces ambient caller/clock globals with explicit parameter passing.
//! The embedding environment resolves the authenticated principal and the
//! current logical clock value once per call and hands both to the entry
//! point; ledgers read them from the context and never cache either across
//! calls.

use synapse_core::{Principal, Timestamp};

/// Context for a single ledger call
///
/// Immutable for the duration of the call. The clock value must be
/// non-decreasing across the sequence of contexts an environment produces;
/// the ledgers store clock values but never compare them against system
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    caller: Principal,
    clock: Timestamp,
}

impl CallContext {
    /// Create a context for a call by `caller` at logical time `clock`
    pub fn new(caller: Principal, clock: Timestamp) -> Self {
        Self { caller, clock }
    }

    /// The authenticated principal making this call
    pub fn caller(&self) -> Principal {
        self.caller
    }

    /// The logical clock value for this call
    pub fn clock(&self) -> Timestamp {
        self.clock
    }
}
