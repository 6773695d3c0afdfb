//! Logical time for ledger operations
//!
//! The platform is ordered by an external logical clock. Entry points read
//! the clock value from the call context; they never sample system time.

/// Logical timestamp supplied by the execution environment.
///
/// Monotonically non-decreasing across the call sequence. The unit is
/// environment-defined (block height, sequence number, or milliseconds);
/// the ledgers only store and compare it.
pub type Timestamp = u64;
