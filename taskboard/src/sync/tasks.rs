//! Task operations

use super::{no_transition, reject, run, SyncContext, SyncOutcome, SyncState};
use crate::error::StoreError;
use crate::guard::{self, GuardRejection};
use crate::store::BoardStore;
use serde_json::Value;
use std::sync::Arc;
use taskboard_client::api::TasksApi;
use taskboard_client::types::{
    Attachment, AttachmentUpload, Board, Column, Comment, CommentInput, CreateTaskInput,
    MoveTaskInput, Task, TaskFilter, TaskId, TaskPatch, TaskPriority, TaskStatus, UserId,
};

/// Store a server copy of the task when the response carried one, otherwise
/// apply the same change locally
fn apply_task<F>(
    store: &mut BoardStore,
    id: &TaskId,
    task: Option<&Task>,
    local: F,
) -> Result<(), StoreError>
where
    F: FnOnce(&mut Task),
{
    match task {
        Some(task) => store.update_task(task.clone()),
        None => store.modify_task(id, local),
    }
}

/// Creates, edits and moves tasks, checking column permissions first
#[derive(Clone)]
pub struct TaskSync {
    ctx: SyncContext,
    api: Arc<dyn TasksApi>,
    state: SyncState,
}

impl TaskSync {
    pub fn new(ctx: SyncContext, api: Arc<dyn TasksApi>) -> Self {
        Self {
            ctx,
            api,
            state: SyncState::new(),
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

    /// Run a guard against the board, column and task the store holds for
    /// `id`. Tasks the store does not know pass.
    async fn check_task<F>(&self, id: &TaskId, check: F) -> Result<(), GuardRejection>
    where
        F: FnOnce(&Board, &Column, &Task) -> Result<(), GuardRejection>,
    {
        let store = self.ctx.store().read().await;
        let Some(task) = store.find_task(id) else {
            return Ok(());
        };
        let Some(column) = store.column_of_task(id) else {
            return Ok(());
        };
        match store.find_board(&column.board_id) {
            Some(board) => check(board, column, task),
            None => Ok(()),
        }
    }

    /// Fetch one task and store it in its column
    pub async fn load_task(&self, id: &TaskId) -> SyncOutcome<Task> {
        run(
            &self.ctx,
            &self.state,
            "load_task",
            Some(format!("task:{id}")),
            self.api.get_task(id),
            |store, task| match task {
                Some(task) => store.upsert_task(task.clone()),
                None => Ok(()),
            },
        )
        .await
    }

    /// Search tasks across boards; results are returned, not stored
    pub async fn load_tasks(&self, filter: &TaskFilter) -> SyncOutcome<Vec<Task>> {
        run(
            &self.ctx,
            &self.state,
            "load_tasks",
            None,
            self.api.get_tasks(filter),
            no_transition,
        )
        .await
    }

    pub async fn create_task(&self, input: &CreateTaskInput) -> SyncOutcome<Task> {
        let check = {
            let store = self.ctx.store().read().await;
            match (
                store.find_board(&input.board_id),
                store.find_column(&input.column_id),
            ) {
                (Some(board), Some(column)) => {
                    guard::check_task_creation(board, column, &input.title)
                }
                _ => guard::require_text("task title", &input.title),
            }
        };
        if let Err(rejection) = check {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "create_task",
            None,
            self.api.create_task(input),
            |store, task| match task {
                Some(task) => {
                    store.add_task_to_column(&input.board_id, &input.column_id, task.clone())
                }
                None => Ok(()),
            },
        )
        .await
    }

    pub async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> SyncOutcome<Task> {
        let check = self
            .check_task(id, |_, column, task| guard::check_task_update(column, task, patch))
            .await;
        if let Err(rejection) = check {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "update_task",
            Some(format!("task:{id}")),
            self.api.update_task(id, patch),
            |store, task| apply_task(store, id, task, |task| patch.apply(task)),
        )
        .await
    }

    pub async fn delete_task(&self, id: &TaskId) -> SyncOutcome<Value> {
        let check = self
            .check_task(id, |_, column, _| guard::check_task_delete(column))
            .await;
        if let Err(rejection) = check {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "delete_task",
            None,
            self.api.delete_task(id),
            |store, _| store.delete_task(id).map(|_| ()),
        )
        .await
    }

    /// Move a task between columns of its board.
    ///
    /// The store places the task at `new_order` itself; when two moves of
    /// one task overlap, the one started last is the one applied.
    pub async fn move_task(&self, id: &TaskId, input: &MoveTaskInput) -> SyncOutcome<Task> {
        let check = {
            let store = self.ctx.store().read().await;
            match (
                store.find_column(&input.from_column_id),
                store.find_column(&input.to_column_id),
            ) {
                (Some(from), Some(to)) => guard::check_task_move(from, to),
                _ => Ok(()),
            }
        };
        if let Err(rejection) = check {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "move_task",
            Some(format!("move-task:{id}")),
            self.api.move_task(id, input),
            |store, _| {
                store.move_task(
                    id,
                    &input.from_column_id,
                    &input.to_column_id,
                    input.new_status,
                    input.new_order,
                )
            },
        )
        .await
    }

    /// Change a task's status. Without a server copy the task moves to the
    /// standard column for the new status, if the board has one.
    pub async fn update_status(&self, id: &TaskId, status: TaskStatus) -> SyncOutcome<Task> {
        if let Err(rejection) = self.check_edit(id).await {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "update_status",
            Some(format!("task-status:{id}")),
            self.api.update_status(id, status),
            |store, task| match task {
                Some(task) => store.update_task(task.clone()),
                None => match store.move_task_by_status(id, status) {
                    Err(StoreError::NoColumnForStatus { .. }) => {
                        store.modify_task(id, |task| task.status = status)
                    }
                    other => other,
                },
            },
        )
        .await
    }

    pub async fn update_priority(&self, id: &TaskId, priority: TaskPriority) -> SyncOutcome<Task> {
        if let Err(rejection) = self.check_edit(id).await {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "update_priority",
            Some(format!("task-priority:{id}")),
            self.api.update_priority(id, priority),
            |store, task| apply_task(store, id, task, |task| task.priority = priority),
        )
        .await
    }

    pub async fn assign_task(&self, id: &TaskId, assignee_id: &UserId) -> SyncOutcome<Task> {
        if let Err(rejection) = self.check_edit(id).await {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "assign_task",
            Some(format!("task-assignee:{id}")),
            self.api.assign_task(id, assignee_id),
            |store, task| {
                apply_task(store, id, task, |task| {
                    task.assignee_id = Some(assignee_id.clone())
                })
            },
        )
        .await
    }

    pub async fn unassign_task(&self, id: &TaskId) -> SyncOutcome<Task> {
        if let Err(rejection) = self.check_edit(id).await {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "unassign_task",
            Some(format!("task-assignee:{id}")),
            self.api.unassign_task(id),
            |store, task| apply_task(store, id, task, |task| task.assignee_id = None),
        )
        .await
    }

    async fn check_edit(&self, id: &TaskId) -> Result<(), GuardRejection> {
        self.check_task(id, |_, column, _| guard::check_task_edit(column))
            .await
    }

    pub async fn add_comment(
        &self,
        task_id: &TaskId,
        input: &CommentInput,
    ) -> SyncOutcome<Comment> {
        if let Err(rejection) = guard::require_text("comment", &input.content) {
            return reject(&self.state, rejection);
        }
        let check = self
            .check_task(task_id, |board, column, _| {
                guard::check_comment(board, column, &input.content)
            })
            .await;
        if let Err(rejection) = check {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "add_comment",
            None,
            self.api.add_comment(task_id, input),
            |store, comment| match comment {
                Some(comment) => store.add_comment(task_id, comment.clone()),
                None => Ok(()),
            },
        )
        .await
    }

    pub async fn upload_attachment(
        &self,
        task_id: &TaskId,
        upload: &AttachmentUpload,
    ) -> SyncOutcome<Attachment> {
        if let Err(rejection) = guard::require_text("file name", &upload.file_name) {
            return reject(&self.state, rejection);
        }
        let check = self
            .check_task(task_id, |board, column, _| guard::check_attachment(board, column))
            .await;
        if let Err(rejection) = check {
            return reject(&self.state, rejection);
        }
        run(
            &self.ctx,
            &self.state,
            "upload_attachment",
            None,
            self.api.upload_attachment(task_id, upload),
            |store, attachment| match attachment {
                Some(attachment) => store.add_attachment(task_id, attachment.clone()),
                None => Ok(()),
            },
        )
        .await
    }
}
