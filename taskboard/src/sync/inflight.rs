//! Last-started-wins bookkeeping for concurrent requests
//!
//! Each request that targets a key (`"board-tasks:b1"`, `"move-task:t1"`)
//! takes a [`Ticket`]. When a newer request for the same key starts, older
//! tickets stop being current and their responses are discarded.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    sequence: AtomicU64,
    latest: Mutex<HashMap<String, u64>>,
}

/// Shared map of the latest request sequence per key
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    inner: Arc<Inner>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request for `key`, superseding any earlier one
    pub fn begin(&self, key: impl Into<String>) -> Ticket {
        let key = key.into();
        let sequence = self.inner.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest().insert(key.clone(), sequence);
        Ticket {
            tracker: self.clone(),
            key,
            sequence,
        }
    }

    /// Make every request in flight for `key` stale without starting one
    pub fn supersede(&self, key: &str) {
        self.latest().remove(key);
    }

    /// [`supersede`](Self::supersede) every key starting with `prefix`
    pub fn supersede_prefix(&self, prefix: &str) {
        self.latest().retain(|key, _| !key.starts_with(prefix));
    }

    /// Number of keys with a request still in flight
    pub fn in_flight(&self) -> usize {
        self.latest().len()
    }

    fn latest(&self) -> std::sync::MutexGuard<'_, HashMap<String, u64>> {
        self.inner
            .latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}

/// One request's claim on a key; released when dropped
#[derive(Debug)]
pub struct Ticket {
    tracker: RequestTracker,
    key: String,
    sequence: u64,
}

impl Ticket {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether no newer request for the key has started since this one
    pub fn is_current(&self) -> bool {
        self.tracker.latest().get(&self.key) == Some(&self.sequence)
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        let mut latest = self.tracker.latest();
        if latest.get(&self.key) == Some(&self.sequence) {
            latest.remove(&self.key);
        }
    }
}
