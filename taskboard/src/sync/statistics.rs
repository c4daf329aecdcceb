//! Aggregate statistics reports
//!
//! Reports are not part of the board store; the last report of each kind is
//! kept on the sync instance instead.

use super::{no_transition, run, SyncContext, SyncOutcome, SyncState};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use taskboard_client::api::{StatisticsApi, StatisticsKind};

#[derive(Clone)]
pub struct StatisticsSync {
    ctx: SyncContext,
    api: Arc<dyn StatisticsApi>,
    state: SyncState,
    reports: Arc<Mutex<HashMap<StatisticsKind, Value>>>,
}

impl StatisticsSync {
    pub fn new(ctx: SyncContext, api: Arc<dyn StatisticsApi>) -> Self {
        Self {
            ctx,
            api,
            state: SyncState::new(),
            reports: Arc::default(),
        }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    /// Fetch a report and remember it as the latest of its kind
    pub async fn load(&self, kind: StatisticsKind) -> SyncOutcome<Value> {
        let outcome = run(
            &self.ctx,
            &self.state,
            "load_statistics",
            Some(format!("statistics:{kind}")),
            self.api.get_statistics(kind),
            no_transition,
        )
        .await;
        if let (true, Some(report)) = (outcome.success, outcome.data.as_ref()) {
            self.reports
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(kind, report.clone());
        }
        outcome
    }

    /// The last report loaded for `kind`, if any
    pub fn report(&self, kind: StatisticsKind) -> Option<Value> {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&kind)
            .cloned()
    }
}
