//! Synchronization layer between the resource APIs and the store
//!
//! Every operation follows the same lifecycle:
//!
//! 1. local guards run against the store; a rejection returns immediately
//!    without any request
//! 2. `loading` is raised and the previous error cleared
//! 3. the resource API is called
//! 4. on success the matching store transition is applied; on failure the
//!    message is recorded as the error
//! 5. `loading` is lowered, whatever happened
//!
//! Operations never return `Err`: every failure is folded into a
//! [`SyncOutcome`] with `success == false`.

mod board_tasks;
mod boards;
mod columns;
mod inflight;
mod statistics;
mod tasks;

pub use board_tasks::{BoardTaskSync, TaskCache};
pub use boards::BoardSync;
pub use columns::ColumnSync;
pub use inflight::{RequestTracker, Ticket};
pub use statistics::StatisticsSync;
pub use tasks::TaskSync;

use crate::error::StoreError;
use crate::guard::GuardRejection;
use crate::store::{BoardStore, StoreHandle};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use taskboard_client::ApiResult;
use tracing::{debug, warn};

/// Error reported for a response that lost to a newer request for the same key
pub const SUPERSEDED: &str = "superseded by a newer request";

/// Result of a sync operation, serializable for callers that print it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome<T> {
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Answered from local state without a request
    #[serde(default)]
    pub from_cache: bool,
}

impl<T> SyncOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self::ok_with(Some(data))
    }

    /// Success whose response may have carried no data
    pub fn ok_with(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            error: None,
            from_cache: false,
        }
    }

    pub fn cached(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            error: None,
            from_cache: true,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            from_cache: false,
        }
    }

    pub fn is_superseded(&self) -> bool {
        self.error.as_deref() == Some(SUPERSEDED)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SyncOutcome<U> {
        SyncOutcome {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            from_cache: self.from_cache,
        }
    }
}

#[derive(Debug, Default)]
struct StateInner {
    loading: usize,
    error: Option<String>,
}

/// The `loading`/`error` pair a sync instance exposes to its callers.
///
/// `loading` counts operations in flight, so overlapping operations on one
/// instance do not clear each other's flag.
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    inner: Arc<Mutex<StateInner>>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StateInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading > 0
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn clear_error(&self) {
        self.lock().error = None;
    }

    fn start(&self) {
        let mut inner = self.lock();
        inner.loading += 1;
        inner.error = None;
    }

    fn finish(&self) {
        let mut inner = self.lock();
        inner.loading = inner.loading.saturating_sub(1);
    }

    fn fail(&self, message: &str) {
        self.lock().error = Some(message.to_string());
    }
}

/// What every sync instance shares: the store and the in-flight map
#[derive(Debug, Clone, Default)]
pub struct SyncContext {
    store: StoreHandle,
    tracker: RequestTracker,
}

impl SyncContext {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store,
            tracker: RequestTracker::new(),
        }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }
}

/// Record a guard rejection and turn it into a failed outcome
pub(crate) fn reject<T>(state: &SyncState, rejection: GuardRejection) -> SyncOutcome<T> {
    let message = rejection.to_string();
    debug!(%message, "Operation rejected locally");
    state.fail(&message);
    SyncOutcome::failed(message)
}

/// Run one request through the lifecycle described in the module docs.
///
/// `key` enables last-started-wins: a response whose ticket is no longer
/// current is discarded before it reaches the store.
pub(crate) async fn run<T, Fut, A>(
    ctx: &SyncContext,
    state: &SyncState,
    operation: &'static str,
    key: Option<String>,
    request: Fut,
    transition: A,
) -> SyncOutcome<T>
where
    Fut: Future<Output = ApiResult<T>>,
    A: FnOnce(&mut BoardStore, Option<&T>) -> Result<(), StoreError>,
{
    state.start();
    let _loading = scopeguard::guard(state.clone(), |state| state.finish());
    let ticket = key.map(|key| ctx.tracker.begin(key));

    let result = request.await;

    if let Some(ref ticket) = ticket {
        if !ticket.is_current() {
            warn!(operation, key = ticket.key(), "Discarding superseded response");
            return SyncOutcome::failed(SUPERSEDED);
        }
    }

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            let message = e.to_string();
            warn!(operation, error = %message, "Request failed");
            state.fail(&message);
            return SyncOutcome::failed(message);
        }
    };

    if !response.success {
        let message = response.failure_message();
        debug!(operation, %message, "API reported failure");
        state.fail(&message);
        return SyncOutcome::failed(message);
    }

    let data = response.data;
    let applied = ctx
        .store
        .apply(|store| {
            // Checked again under the lock: the key may be superseded while
            // the write lock is awaited
            if ticket.as_ref().is_some_and(|ticket| !ticket.is_current()) {
                return Ok(false);
            }
            transition(store, data.as_ref()).map(|()| true)
        })
        .await;
    match applied {
        Ok(true) => {}
        Ok(false) => {
            warn!(operation, "Discarding superseded response");
            return SyncOutcome::failed(SUPERSEDED);
        }
        // The server accepted the change; the next load reconciles the store
        Err(e) => warn!(operation, error = %e, "Response could not be applied to the store"),
    }
    debug!(operation, "Sync operation succeeded");
    SyncOutcome::ok_with(data)
}

/// Transition for operations that only read
pub(crate) fn no_transition<T>(_: &mut BoardStore, _: Option<&T>) -> Result<(), StoreError> {
    Ok(())
}
