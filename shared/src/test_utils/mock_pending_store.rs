use std::sync::Mutex;

use crate::error::StoreError;
use crate::models::PendingInvitationRecord;
use crate::pending::{filter_fresh, PendingInvitationStore};

/// In-memory single-slot store for tests. Same staleness policy as the
/// file-backed store, without touching disk.
pub struct MemoryPendingStore {
    slot: Mutex<Option<PendingInvitationRecord>>,
}

impl MemoryPendingStore {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Create a store pre-seeded with a record, bypassing `put` (lets tests
    /// plant records with arbitrary timestamps).
    pub fn with_record(record: PendingInvitationRecord) -> Self {
        Self {
            slot: Mutex::new(Some(record)),
        }
    }

    /// Raw slot contents, without the staleness filtering `get` applies.
    pub fn raw_slot(&self) -> Option<PendingInvitationRecord> {
        self.slot.lock().unwrap().clone()
    }
}

impl Default for MemoryPendingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingInvitationStore for MemoryPendingStore {
    fn put(&self, record: PendingInvitationRecord) -> Result<(), StoreError> {
        *self.slot.lock().unwrap() = Some(record);
        Ok(())
    }

    fn get(&self) -> Option<PendingInvitationRecord> {
        let mut slot = self.slot.lock().unwrap();
        match slot.take() {
            Some(record) => match filter_fresh(record) {
                Some(record) => {
                    *slot = Some(record.clone());
                    Some(record)
                }
                None => None, // stale record stays purged
            },
            None => None,
        }
    }

    fn clear(&self) {
        *self.slot.lock().unwrap() = None;
    }
}
