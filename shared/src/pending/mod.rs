use crate::error::StoreError;
use crate::models::{epoch_ms, PendingInvitationRecord};

// Expose the file-backed implementation
pub mod file;

/// A record older than this is treated as absent and purged on read.
pub const PENDING_INVITATION_TTL_MS: i64 = 3_600_000; // 1 hour

/// Single-slot durable stash for an in-flight invitation.
///
/// One pending invitation at a time: `put` overwrites any prior record.
/// `get` never fails — stale or unparsable data is purged and reported as
/// absent. The Acceptance Coordinator is the only writer.
pub trait PendingInvitationStore: Send + Sync + 'static {
    fn put(&self, record: PendingInvitationRecord) -> Result<(), StoreError>;

    /// Returns the stored record, or `None` (clearing the slot) when the
    /// record is stale or the slot contents cannot be parsed.
    fn get(&self) -> Option<PendingInvitationRecord>;

    fn clear(&self);
}

/// Shared staleness policy for store implementations.
pub(crate) fn filter_fresh(record: PendingInvitationRecord) -> Option<PendingInvitationRecord> {
    if record.is_stale(epoch_ms(), PENDING_INVITATION_TTL_MS) {
        None
    } else {
        Some(record)
    }
}
