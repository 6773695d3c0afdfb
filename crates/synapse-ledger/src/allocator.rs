//! Monotonic identifier allocation
//!
//! Each ledger table owns one allocator. Ids start at 1 and increase by one
//! per allocation; an id is never reused. Creation entry points allocate
//! only after every validation has passed, so failed calls do not consume
//! ids.

use serde::{Deserialize, Serialize};

/// Per-table monotonic id counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create an allocator whose first id will be 1
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next id and advance the counter
    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next allocation will return
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
