//! Shared, persisted access to the store

use super::{BoardStore, Snapshot};
use crate::error::StoreError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, warn};

/// Cloneable handle to the one store every reader and sync operation shares.
///
/// When opened with a snapshot path, every successful transition is written
/// back to disk. Write failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    inner: Arc<RwLock<BoardStore>>,
    snapshot_path: Option<Arc<PathBuf>>,
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl StoreHandle {
    /// A store that is never persisted
    pub fn in_memory() -> Self {
        Self::from_store(BoardStore::new())
    }

    pub fn from_store(store: BoardStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
            snapshot_path: None,
        }
    }

    /// Rehydrate from `path` and persist there from now on.
    ///
    /// A missing, unreadable or too-new snapshot yields an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let store = match tokio::fs::read_to_string(&path).await {
            Ok(content) => Snapshot::decode(&content)
                .map(Snapshot::into_store)
                .unwrap_or_default(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No store snapshot yet");
                BoardStore::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read store snapshot");
                BoardStore::new()
            }
        };
        debug!(
            path = %path.display(),
            boards = store.boards().len(),
            "Store rehydrated"
        );
        Self {
            inner: Arc::new(RwLock::new(store)),
            snapshot_path: Some(Arc::new(path)),
        }
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref().map(PathBuf::as_path)
    }

    /// Shared read access for consumers
    pub async fn read(&self) -> RwLockReadGuard<'_, BoardStore> {
        self.inner.read().await
    }

    /// Owned copy of the current state
    pub async fn snapshot(&self) -> BoardStore {
        self.inner.read().await.clone()
    }

    /// Run a transition under the write lock, persisting on success.
    pub async fn apply<R, F>(&self, transition: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut BoardStore) -> Result<R, StoreError>,
    {
        let mut store = self.inner.write().await;
        let result = transition(&mut store)?;
        // Written under the lock so snapshots land in transition order
        self.persist(&store).await;
        Ok(result)
    }

    async fn persist(&self, store: &BoardStore) {
        let Some(ref path) = self.snapshot_path else {
            return;
        };
        if let Err(e) = write_snapshot(path, &Snapshot::of(store)).await {
            warn!(path = %path.display(), error = %e, "Failed to persist store snapshot");
        }
    }
}

async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string_pretty(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, content).await?;
    tokio::fs::rename(&tmp, path).await
}
