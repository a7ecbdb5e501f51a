use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::StoreError;
use crate::models::PendingInvitationRecord;
use crate::pending::{filter_fresh, PendingInvitationStore};

const SLOT_FILE_NAME: &str = "pending-invitation.json";

/// File-backed single-slot store: one JSON document on disk, surviving
/// process restarts and the login redirect round-trip.
pub struct FilePendingStore {
    path: PathBuf,
}

impl FilePendingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the slot under `dir` with the default file name.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SLOT_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn remove_slot(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to clear pending slot {}: {}", self.path.display(), e);
            }
        }
    }
}

impl PendingInvitationStore for FilePendingStore {
    fn put(&self, record: PendingInvitationRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string(&record)?;
        fs::write(&self.path, body)?;
        debug!("Stashed pending invitation at {}", self.path.display());
        Ok(())
    }

    fn get(&self) -> Option<PendingInvitationRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read pending slot {}: {}", self.path.display(), e);
                }
                return None;
            }
        };

        let record: PendingInvitationRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!("Purging unparsable pending slot: {}", e);
                self.remove_slot();
                return None;
            }
        };

        match filter_fresh(record) {
            Some(record) => Some(record),
            None => {
                debug!("Purging stale pending invitation");
                self.remove_slot();
                None
            }
        }
    }

    fn clear(&self) {
        self.remove_slot();
    }
}
