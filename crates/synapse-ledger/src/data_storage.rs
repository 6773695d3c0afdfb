//! Brain-data record registry
//!
//! Owner-scoped records referencing off-ledger brain data by opaque digest.
//! Records are never deleted; the only mutable field is the visibility
//! flag, and only the record owner may change it. Read access is
//! unrestricted.

use crate::allocator::IdAllocator;
use crate::context::CallContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use synapse_core::{DataDigest, LedgerError, Principal, RecordId, Result, Timestamp};
use tracing::debug;

/// A registered brain-data record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRecord {
    /// Principal that stored the record; immutable
    pub owner: Principal,
    /// Caller-supplied digest of the off-ledger blob; never interpreted
    pub digest: DataDigest,
    /// Logical clock value at storage time
    pub stored_at: Timestamp,
    /// Whether the record is publicly visible
    pub is_public: bool,
}

/// Registry of brain-data records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStorageLedger {
    records: BTreeMap<RecordId, DataRecord>,
    allocator: IdAllocator,
}

impl DataStorageLedger {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a data record owned by the caller
    ///
    /// Always succeeds; returns the newly allocated record id.
    pub fn store_data(&mut self, ctx: &CallContext, digest: DataDigest, is_public: bool) -> RecordId {
        let id = RecordId::new(self.allocator.allocate());
        self.records.insert(
            id,
            DataRecord {
                owner: ctx.caller(),
                digest,
                stored_at: ctx.clock(),
                is_public,
            },
        );
        debug!("stored data record {} for {}", id, ctx.caller());
        id
    }

    /// Look up a record; `None` if the id was never allocated
    pub fn data_record(&self, id: RecordId) -> Option<&DataRecord> {
        self.records.get(&id)
    }

    /// Set the visibility flag of a record; owner only
    pub fn update_visibility(
        &mut self,
        ctx: &CallContext,
        id: RecordId,
        is_public: bool,
    ) -> Result<()> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or_else(|| LedgerError::not_found(format!("data record {id}")))?;
        if record.owner != ctx.caller() {
            return Err(LedgerError::unauthorized(format!(
                "only the owner may change visibility of {id}"
            )));
        }
        record.is_public = is_public;
        debug!("visibility of {} set to {}", id, is_public);
        Ok(())
    }

    /// Whether a record is publicly visible; `NotFound` if the id is unknown
    pub fn is_public(&self, id: RecordId) -> Result<bool> {
        self.records
            .get(&id)
            .map(|record| record.is_public)
            .ok_or_else(|| LedgerError::not_found(format!("data record {id}")))
    }
}
