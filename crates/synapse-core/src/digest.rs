//! Opaque digests for off-ledger brain data
//!
//! The platform never stores raw brain recordings. Callers compute a digest
//! of the off-ledger blob and register that. The ledger treats the digest as
//! an opaque value: stored, returned, compared for equality, never
//! interpreted or verified.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of a data digest in bytes
pub const DIGEST_LEN: usize = 16;

/// Fixed-width opaque digest identifying an off-ledger data blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DataDigest(pub [u8; DIGEST_LEN]);

impl DataDigest {
    /// Create from raw digest bytes
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the digest bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Hex encoding of the digest
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string; `None` if the input is not exactly
    /// 16 hex-encoded bytes.
    pub fn from_hex(s: &str) -> Option<Self> {
        let decoded = hex::decode(s).ok()?;
        let bytes: [u8; DIGEST_LEN] = decoded.try_into().ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Display for DataDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; DIGEST_LEN]> for DataDigest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}
