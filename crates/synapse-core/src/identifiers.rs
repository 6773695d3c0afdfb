//! Identifier types used across the Synapse platform
//!
//! This module provides the identifier types that uniquely identify the
//! entities held by the ledger modules: the authenticated principals that
//! own records, and the sequential ids allocated for applications, data
//! records, and training programs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

fn derived_uuid(label: &[u8]) -> Uuid {
    let digest = Sha256::digest(label);
    let mut uuid_bytes = [0u8; 16];
    uuid_bytes.copy_from_slice(&digest[..16]);
    Uuid::from_bytes(uuid_bytes)
}

/// Authenticated caller identity
///
/// Principals are opaque: the ledgers compare them for equality and never
/// inspect their structure. The execution environment resolves the principal
/// for each call and passes it in via the call context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Principal(pub Uuid);

impl Principal {
    /// Create a new random principal
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derive a stable principal from a label
    ///
    /// The same label always yields the same principal. Intended for
    /// deterministic fixtures and well-known accounts.
    pub fn derive(label: &str) -> Self {
        Self(derived_uuid(label.as_bytes()))
    }

    /// Create from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "principal-{}", self.0)
    }
}

impl From<Uuid> for Principal {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<Principal> for Uuid {
    fn from(principal: Principal) -> Self {
        principal.0
    }
}

macro_rules! sequential_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl $name {
            /// Create from a raw id value
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the inner id value
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

sequential_id!(
    /// Identifier for a marketplace application listing
    ///
    /// Allocated sequentially by the marketplace ledger; never reused.
    ApplicationId,
    "app"
);

sequential_id!(
    /// Identifier for a stored brain-data record
    RecordId,
    "record"
);

sequential_id!(
    /// Identifier for a neurofeedback training program
    ProgramId,
    "program"
);
