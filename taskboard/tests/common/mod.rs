//! In-memory resource APIs that count calls

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use taskboard::{BoardStore, StoreHandle, SyncContext};
use taskboard_client::api::{BoardsApi, ColumnsApi, StatisticsApi, StatisticsKind, TasksApi};
use taskboard_client::types::{
    Attachment, AttachmentUpload, Board, BoardId, BoardPatch, BoardStatistics, Column, ColumnId,
    ColumnPatch, Comment, CommentId, CommentInput, CreateBoardInput, CreateColumnInput,
    CreateTaskInput, MoveTaskInput, StandardColumn, Task, TaskFilter, TaskId, TaskPatch,
    TaskPriority, TaskStatus, UserId,
};
use taskboard_client::{ApiResponse, ApiResult, ClientError};

/// A successful response that carried no body
pub fn ack<T>() -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data: None,
        message: None,
        error: None,
    }
}

/// Board `b1` with the four standard columns plus a custom "Ideas" column
pub fn sample_board() -> Board {
    Board::new("b1", "Launch").with_columns(vec![
        Column::standard("col-plan", "b1", StandardColumn::Planning, 0),
        Column::standard("col-prog", "b1", StandardColumn::InProgress, 1),
        Column::standard("col-rev", "b1", StandardColumn::Review, 2),
        Column::standard("col-done", "b1", StandardColumn::Completed, 3),
        Column::new("col-ideas", "b1", "Ideas", 4),
    ])
}

pub fn store_with(boards: Vec<Board>) -> StoreHandle {
    StoreHandle::from_store(BoardStore::from_parts(boards, None))
}

pub fn context_with(boards: Vec<Board>) -> SyncContext {
    SyncContext::new(store_with(boards))
}

/// One fake standing in for every resource API.
///
/// Mutations are acknowledged without data unless noted, so the sync layer
/// falls back to applying the change locally.
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    next_id: AtomicUsize,
    boards: Mutex<Vec<Board>>,
    board_tasks: Mutex<HashMap<BoardId, VecDeque<(Duration, Vec<Task>)>>>,
    failure: Mutex<Option<String>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_boards(boards: Vec<Board>) -> Arc<Self> {
        let api = Self::default();
        *api.boards.lock().unwrap() = boards;
        Arc::new(api)
    }

    /// Queue the answer to the next `get_board_tasks(board_id)`
    pub fn reply_board_tasks(&self, board_id: &str, delay: Duration, tasks: Vec<Task>) {
        self.board_tasks
            .lock()
            .unwrap()
            .entry(BoardId::from(board_id))
            .or_default()
            .push_back((delay, tasks));
    }

    /// Make every following call answer `success: false` with `message`
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn count_of(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.as_str() == method)
            .count()
    }

    fn record(&self, method: &str) {
        self.calls.lock().unwrap().push(method.to_string());
    }

    fn generated_id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn respond<T>(&self, method: &str, reply: impl FnOnce() -> ApiResponse<T>) -> ApiResult<T> {
        self.record(method);
        if let Some(ref message) = *self.failure.lock().unwrap() {
            return Ok(ApiResponse::failure(message.clone()));
        }
        Ok(reply())
    }

    fn find_board(&self, id: &BoardId) -> Option<Board> {
        self.boards
            .lock()
            .unwrap()
            .iter()
            .find(|b| &b.id == id)
            .cloned()
    }
}

#[async_trait]
impl BoardsApi for FakeApi {
    async fn get_boards(&self) -> ApiResult<Vec<Board>> {
        self.respond("get_boards", || {
            ApiResponse::success(self.boards.lock().unwrap().clone())
        })
    }

    async fn get_board(&self, id: &BoardId) -> ApiResult<Board> {
        self.respond("get_board", || match self.find_board(id) {
            Some(board) => ApiResponse::success(board),
            None => ApiResponse::failure("Board not found"),
        })
    }

    async fn create_board(&self, input: &CreateBoardInput) -> ApiResult<Board> {
        self.respond("create_board", || {
            ApiResponse::success(Board::new(self.generated_id("b-new-"), input.title.clone()))
        })
    }

    async fn update_board(&self, id: &BoardId, patch: &BoardPatch) -> ApiResult<Board> {
        self.respond("update_board", || match self.find_board(id) {
            Some(mut board) => {
                patch.apply(&mut board);
                ApiResponse::success(board)
            }
            None => ack(),
        })
    }

    async fn delete_board(&self, _id: &BoardId) -> ApiResult<Value> {
        self.respond("delete_board", || ApiResponse::success(json!({"deleted": true})))
    }

    async fn toggle_favorite(&self, _id: &BoardId) -> ApiResult<Board> {
        self.respond("toggle_favorite", ack)
    }

    async fn get_board_statistics(&self, _id: &BoardId) -> ApiResult<BoardStatistics> {
        self.respond("get_board_statistics", || {
            ApiResponse::success(BoardStatistics {
                total_tasks: 4,
                completed_tasks: 1,
                ..Default::default()
            })
        })
    }
}

#[async_trait]
impl ColumnsApi for FakeApi {
    async fn create_column(
        &self,
        board_id: &BoardId,
        input: &CreateColumnInput,
    ) -> ApiResult<Column> {
        self.respond("create_column", || {
            ApiResponse::success(Column::new(
                self.generated_id("col-new-"),
                board_id.clone(),
                input.title.clone(),
                input.order.unwrap_or(0),
            ))
        })
    }

    async fn update_column(
        &self,
        _board_id: &BoardId,
        _column_id: &ColumnId,
        _patch: &ColumnPatch,
    ) -> ApiResult<Column> {
        self.respond("update_column", ack)
    }

    async fn delete_column(&self, _board_id: &BoardId, _column_id: &ColumnId) -> ApiResult<Value> {
        self.respond("delete_column", ack)
    }
}

#[async_trait]
impl TasksApi for FakeApi {
    async fn get_tasks(&self, _filter: &TaskFilter) -> ApiResult<Vec<Task>> {
        self.respond("get_tasks", || ApiResponse::success(Vec::new()))
    }

    async fn get_board_tasks(&self, board_id: &BoardId) -> ApiResult<Vec<Task>> {
        let (delay, tasks) = self
            .board_tasks
            .lock()
            .unwrap()
            .get_mut(board_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_default();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.respond("get_board_tasks", || ApiResponse::success(tasks))
    }

    async fn get_task(&self, id: &TaskId) -> ApiResult<Task> {
        self.respond("get_task", || {
            ApiResponse::success(Task::new(id.clone(), "b1", "col-rev", "Fetched"))
        })
    }

    async fn create_task(&self, input: &CreateTaskInput) -> ApiResult<Task> {
        self.respond("create_task", || {
            let mut task = Task::new(
                self.generated_id("t"),
                input.board_id.clone(),
                input.column_id.clone(),
                input.title.clone(),
            );
            task.status = input.status.unwrap_or_default();
            ApiResponse::success(task)
        })
    }

    async fn update_task(&self, _id: &TaskId, _patch: &TaskPatch) -> ApiResult<Task> {
        self.respond("update_task", ack)
    }

    async fn delete_task(&self, _id: &TaskId) -> ApiResult<Value> {
        self.respond("delete_task", ack)
    }

    async fn move_task(&self, _id: &TaskId, _input: &MoveTaskInput) -> ApiResult<Task> {
        self.respond("move_task", ack)
    }

    async fn update_status(&self, _id: &TaskId, _status: TaskStatus) -> ApiResult<Task> {
        self.respond("update_status", ack)
    }

    async fn update_priority(&self, _id: &TaskId, _priority: TaskPriority) -> ApiResult<Task> {
        self.respond("update_priority", ack)
    }

    async fn assign_task(&self, _id: &TaskId, _assignee_id: &UserId) -> ApiResult<Task> {
        self.respond("assign_task", ack)
    }

    async fn unassign_task(&self, _id: &TaskId) -> ApiResult<Task> {
        self.respond("unassign_task", ack)
    }

    async fn add_comment(&self, id: &TaskId, input: &CommentInput) -> ApiResult<Comment> {
        self.respond("add_comment", || {
            ApiResponse::success(Comment {
                id: CommentId::from(self.generated_id("cm")),
                task_id: id.clone(),
                board_id: None,
                author_id: UserId::from("u1"),
                content: input.content.clone(),
                mentions: input.mentions.clone(),
                attachments: Vec::new(),
                replies: Vec::new(),
                likes: Vec::new(),
                reactions: Vec::new(),
                is_pinned: false,
                is_private: input.is_private,
                created_at: None,
                updated_at: None,
            })
        })
    }

    async fn upload_attachment(
        &self,
        _id: &TaskId,
        upload: &AttachmentUpload,
    ) -> ApiResult<Attachment> {
        self.respond("upload_attachment", || {
            ApiResponse::success(Attachment {
                id: self.generated_id("att"),
                filename: upload.file_name.clone(),
                url: String::new(),
                mime_type: upload.mime_type.clone(),
                size: Some(upload.bytes.len() as u64),
                uploaded_by: None,
                uploaded_at: None,
            })
        })
    }
}

#[async_trait]
impl StatisticsApi for FakeApi {
    async fn get_statistics(&self, kind: StatisticsKind) -> ApiResult<Value> {
        self.respond("get_statistics", || {
            ApiResponse::success(json!({"kind": kind.as_str(), "total": 12}))
        })
    }
}

/// A tasks API whose every call fails in transport
pub struct OfflineTasks;

#[async_trait]
impl TasksApi for OfflineTasks {
    async fn get_tasks(&self, _filter: &TaskFilter) -> ApiResult<Vec<Task>> {
        Err(ClientError::Timeout)
    }

    async fn get_board_tasks(&self, _board_id: &BoardId) -> ApiResult<Vec<Task>> {
        Err(ClientError::Timeout)
    }

    async fn get_task(&self, _id: &TaskId) -> ApiResult<Task> {
        Err(ClientError::Timeout)
    }

    async fn create_task(&self, _input: &CreateTaskInput) -> ApiResult<Task> {
        Err(ClientError::Timeout)
    }

    async fn update_task(&self, _id: &TaskId, _patch: &TaskPatch) -> ApiResult<Task> {
        Err(ClientError::Timeout)
    }

    async fn delete_task(&self, _id: &TaskId) -> ApiResult<Value> {
        Err(ClientError::Timeout)
    }

    async fn move_task(&self, _id: &TaskId, _input: &MoveTaskInput) -> ApiResult<Task> {
        Err(ClientError::Timeout)
    }

    async fn update_status(&self, _id: &TaskId, _status: TaskStatus) -> ApiResult<Task> {
        Err(ClientError::Timeout)
    }

    async fn update_priority(&self, _id: &TaskId, _priority: TaskPriority) -> ApiResult<Task> {
        Err(ClientError::Timeout)
    }

    async fn assign_task(&self, _id: &TaskId, _assignee_id: &UserId) -> ApiResult<Task> {
        Err(ClientError::Timeout)
    }

    async fn unassign_task(&self, _id: &TaskId) -> ApiResult<Task> {
        Err(ClientError::Timeout)
    }

    async fn add_comment(&self, _id: &TaskId, _input: &CommentInput) -> ApiResult<Comment> {
        Err(ClientError::Timeout)
    }

    async fn upload_attachment(
        &self,
        _id: &TaskId,
        _upload: &AttachmentUpload,
    ) -> ApiResult<Attachment> {
        Err(ClientError::Timeout)
    }
}
