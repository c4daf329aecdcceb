//! The persisted form of the store

use super::BoardStore;
use crate::derive::migrate_standard_columns;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_client::types::{Board, UserProfile};
use tracing::{debug, warn};

/// Current snapshot format; snapshots without a version are version 0
pub const SNAPSHOT_VERSION: u32 = 1;

/// What is written to disk: `{version, boards, user}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl Snapshot {
    pub fn of(store: &BoardStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            boards: store.boards().to_vec(),
            user: store.user().cloned(),
        }
    }

    /// Decode a snapshot, upgrading old versions.
    ///
    /// Returns `None` (after logging why) for unparseable data or a version
    /// newer than this build understands.
    pub fn decode(content: &str) -> Option<Self> {
        let value: Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable store snapshot");
                return None;
            }
        };
        let version = value.get("version").and_then(Value::as_u64).unwrap_or(0);
        if version > u64::from(SNAPSHOT_VERSION) {
            warn!(version, supported = SNAPSHOT_VERSION, "Ignoring snapshot from a newer version");
            return None;
        }

        let mut snapshot: Snapshot = match serde_json::from_value(value) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Ignoring store snapshot with unexpected shape");
                return None;
            }
        };

        if snapshot.version == 0 {
            let migrated: usize = snapshot
                .boards
                .iter_mut()
                .map(migrate_standard_columns)
                .sum();
            debug!(migrated, "Migrated standard columns from a version 0 snapshot");
            snapshot.version = SNAPSHOT_VERSION;
        }
        Some(snapshot)
    }

    pub fn into_store(self) -> BoardStore {
        BoardStore::from_parts(self.boards, self.user)
    }
}
