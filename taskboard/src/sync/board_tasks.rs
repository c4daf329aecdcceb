//! Per-board task loading with a freshness cache
//!
//! [`BoardTaskSync`] wraps [`TaskSync`]: every task change that succeeds
//! marks the task's board stale, so the next `load_board_tasks` for that
//! board goes back to the server. Marking a board stale also discards any
//! load of it still in flight.

use super::{run, SyncContext, SyncOutcome, SyncState, TaskSync};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use taskboard_client::api::TasksApi;
use taskboard_client::types::{
    BoardId, CreateTaskInput, MoveTaskInput, Task, TaskId, TaskPatch, TaskPriority, TaskStatus,
    UserId,
};
use tracing::{debug, warn};

const BOARD_TASKS_PREFIX: &str = "board-tasks:";

fn board_tasks_key(board_id: &BoardId) -> String {
    format!("{BOARD_TASKS_PREFIX}{board_id}")
}

/// Board ids whose tasks match the server's last answer.
///
/// Tasks normally live in the store. For a board the store has not loaded
/// yet, the fetched tasks are held here instead.
#[derive(Debug, Default)]
pub struct TaskCache {
    fresh: Mutex<HashMap<BoardId, Option<Vec<Task>>>>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh(&self) -> MutexGuard<'_, HashMap<BoardId, Option<Vec<Task>>>> {
        self.fresh.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_fresh(&self, board_id: &BoardId) -> bool {
        self.fresh().contains_key(board_id)
    }

    /// Mark a board fresh whose tasks are in the store
    pub fn mark_fresh(&self, board_id: &BoardId) {
        self.fresh().insert(board_id.clone(), None);
    }

    /// Mark a board fresh, keeping tasks the store had no board for
    pub fn hold(&self, board_id: &BoardId, tasks: Vec<Task>) {
        self.fresh().insert(board_id.clone(), Some(tasks));
    }

    /// Tasks held for a board the store does not know
    pub fn held(&self, board_id: &BoardId) -> Option<Vec<Task>> {
        self.fresh().get(board_id).cloned().flatten()
    }

    /// Forget one board, or every board when `board_id` is `None`
    pub fn invalidate(&self, board_id: Option<&BoardId>) {
        let mut fresh = self.fresh();
        match board_id {
            Some(id) => {
                fresh.remove(id);
            }
            None => fresh.clear(),
        }
    }

    pub fn len(&self) -> usize {
        self.fresh().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fresh().is_empty()
    }
}

/// Task operations plus cached per-board loading.
///
/// Each instance owns its cache; two instances never share freshness.
pub struct BoardTaskSync {
    ctx: SyncContext,
    api: Arc<dyn TasksApi>,
    tasks: TaskSync,
    state: SyncState,
    cache: TaskCache,
}

impl BoardTaskSync {
    pub fn new(ctx: SyncContext, api: Arc<dyn TasksApi>) -> Self {
        Self {
            tasks: TaskSync::new(ctx.clone(), api.clone()),
            ctx,
            api,
            state: SyncState::new(),
            cache: TaskCache::new(),
        }
    }

    /// The wrapped task operations, for those that leave the cache alone
    pub fn tasks(&self) -> &TaskSync {
        &self.tasks
    }

    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading() || self.tasks.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error().or_else(|| self.tasks.error())
    }

    pub fn is_fresh(&self, board_id: &BoardId) -> bool {
        self.cache.is_fresh(board_id)
    }

    /// Load a board's tasks into its columns.
    ///
    /// A fresh board is answered from the store without a request unless
    /// `force_reload` is set.
    pub async fn load_board_tasks(
        &self,
        board_id: &BoardId,
        force_reload: bool,
    ) -> SyncOutcome<Vec<Task>> {
        if !force_reload && self.cache.is_fresh(board_id) {
            debug!(%board_id, "Board tasks served from cache");
            let tasks = match self.cache.held(board_id) {
                Some(tasks) => Some(tasks),
                None => self.ctx.store().read().await.board_tasks(board_id).ok(),
            };
            return SyncOutcome::cached(tasks);
        }

        let cache = &self.cache;
        run(
            &self.ctx,
            &self.state,
            "load_board_tasks",
            Some(board_tasks_key(board_id)),
            self.api.get_board_tasks(board_id),
            |store, tasks| {
                let tasks = tasks.cloned().unwrap_or_default();
                if store.find_board(board_id).is_none() {
                    debug!(%board_id, "Board not in the store; holding its tasks");
                    cache.hold(board_id, tasks);
                    return Ok(());
                }
                let skipped = store.update_board_tasks(board_id, tasks)?;
                if !skipped.is_empty() {
                    warn!(%board_id, ?skipped, "Skipped tasks naming unknown columns");
                }
                // Under the store lock, so an invalidation cannot slip between
                // applying the tasks and marking the board fresh
                cache.mark_fresh(board_id);
                Ok(())
            },
        )
        .await
    }

    /// Mark one board stale, or every board; repeated calls change nothing.
    ///
    /// Loads of the affected boards still in flight are discarded.
    pub fn clear_board_tasks_cache(&self, board_id: Option<&BoardId>) {
        let tracker = self.ctx.tracker();
        match board_id {
            Some(id) => tracker.supersede(&board_tasks_key(id)),
            None => tracker.supersede_prefix(BOARD_TASKS_PREFIX),
        }
        self.cache.invalidate(board_id);
    }

    async fn board_of(&self, id: &TaskId) -> Option<BoardId> {
        self.ctx
            .store()
            .read()
            .await
            .find_task(id)
            .map(|task| task.board_id.clone())
    }

    /// Invalidate the boards a task lived on before and after a change
    fn invalidate_for(&self, before: Option<BoardId>, after: Option<&Task>, success: bool) {
        if !success {
            return;
        }
        for board_id in before.iter().chain(after.map(|task| &task.board_id)) {
            self.clear_board_tasks_cache(Some(board_id));
        }
    }

    pub async fn create_task(&self, input: &CreateTaskInput) -> SyncOutcome<Task> {
        let outcome = self.tasks.create_task(input).await;
        self.invalidate_for(Some(input.board_id.clone()), outcome.data.as_ref(), outcome.success);
        outcome
    }

    pub async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> SyncOutcome<Task> {
        let before = self.board_of(id).await;
        let outcome = self.tasks.update_task(id, patch).await;
        self.invalidate_for(before, outcome.data.as_ref(), outcome.success);
        outcome
    }

    pub async fn delete_task(&self, id: &TaskId) -> SyncOutcome<Value> {
        let before = self.board_of(id).await;
        let outcome = self.tasks.delete_task(id).await;
        self.invalidate_for(before, None, outcome.success);
        outcome
    }

    pub async fn move_task(&self, id: &TaskId, input: &MoveTaskInput) -> SyncOutcome<Task> {
        let before = self.board_of(id).await;
        let outcome = self.tasks.move_task(id, input).await;
        self.invalidate_for(before, outcome.data.as_ref(), outcome.success);
        outcome
    }

    pub async fn update_status(&self, id: &TaskId, status: TaskStatus) -> SyncOutcome<Task> {
        let before = self.board_of(id).await;
        let outcome = self.tasks.update_status(id, status).await;
        self.invalidate_for(before, outcome.data.as_ref(), outcome.success);
        outcome
    }

    pub async fn update_priority(&self, id: &TaskId, priority: TaskPriority) -> SyncOutcome<Task> {
        let before = self.board_of(id).await;
        let outcome = self.tasks.update_priority(id, priority).await;
        self.invalidate_for(before, outcome.data.as_ref(), outcome.success);
        outcome
    }

    pub async fn assign_task(&self, id: &TaskId, assignee_id: &UserId) -> SyncOutcome<Task> {
        let before = self.board_of(id).await;
        let outcome = self.tasks.assign_task(id, assignee_id).await;
        self.invalidate_for(before, outcome.data.as_ref(), outcome.success);
        outcome
    }

    pub async fn unassign_task(&self, id: &TaskId) -> SyncOutcome<Task> {
        let before = self.board_of(id).await;
        let outcome = self.tasks.unassign_task(id).await;
        self.invalidate_for(before, outcome.data.as_ref(), outcome.success);
        outcome
    }
}
