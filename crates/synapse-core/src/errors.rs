//! Unified error system for the Synapse ledgers
//!
//! Every entry point fails with one `LedgerError`. Failures are explicit
//! discriminated results: callers branch on the variant, and the numeric
//! codes the platform exposes externally are derived via
//! [`LedgerError::status_code`] rather than baked into the variants.
//!
//! Pure lookups never produce errors; absence of a record is an `Option`,
//! not a failure.

use serde::{Deserialize, Serialize};

/// Unified error type for all ledger operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LedgerError {
    /// Caller lacks the required role (owner, developer, creator, or
    /// self-as-sender)
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Which authorization check failed
        message: String,
    },

    /// Referenced id has never been allocated
    #[error("not found: {message}")]
    NotFound {
        /// Which record was looked up
        message: String,
    },

    /// Operation is disallowed in the entity's current state
    #[error("invalid state: {message}")]
    InvalidState {
        /// Why the operation is disallowed right now
        message: String,
    },

    /// Sender balance is below the requested transfer amount
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Sender balance at the time of the call
        balance: u64,
        /// Amount the call tried to move
        requested: u64,
    },

    /// A credit would exceed the representable balance range
    #[error("arithmetic overflow: {message}")]
    ArithmeticOverflow {
        /// Which accumulator would have overflowed
        message: String,
    },
}

impl LedgerError {
    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create an insufficient funds error
    pub fn insufficient_funds(balance: u64, requested: u64) -> Self {
        Self::InsufficientFunds { balance, requested }
    }

    /// Create an arithmetic overflow error
    pub fn overflow(message: impl Into<String>) -> Self {
        Self::ArithmeticOverflow {
            message: message.into(),
        }
    }

    /// Numeric code the platform reports externally for this failure
    ///
    /// Authorization, not-found, and invalid-state failures carry the
    /// HTTP-shaped codes 403/404/400. Funds and overflow failures are
    /// distinct variants with no numeric alias.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::InvalidState { .. } => Some(400),
            Self::InsufficientFunds { .. } | Self::ArithmeticOverflow { .. } => None,
        }
    }
}

/// Standard Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
