//! Tasks: `/tasks`, `/boards/{id}/tasks`, and per-task sub-resources

use super::{encode, segment, typed, ApiResult};
use crate::client::ApiClient;
use crate::error::ClientError;
use crate::types::{
    Attachment, AttachmentUpload, BoardId, Comment, CommentInput, CreateTaskInput, MoveTaskInput,
    Task, TaskFilter, TaskId, TaskPatch, TaskPriority, TaskStatus, UserId,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

#[async_trait]
pub trait TasksApi: Send + Sync {
    /// `GET /tasks` with optional filters
    async fn get_tasks(&self, filter: &TaskFilter) -> ApiResult<Vec<Task>>;

    /// `GET /boards/{id}/tasks`
    async fn get_board_tasks(&self, board_id: &BoardId) -> ApiResult<Vec<Task>>;

    /// `GET /tasks/{id}`
    async fn get_task(&self, id: &TaskId) -> ApiResult<Task>;

    /// `POST /tasks`
    async fn create_task(&self, input: &CreateTaskInput) -> ApiResult<Task>;

    /// `PUT /tasks/{id}`
    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> ApiResult<Task>;

    /// `DELETE /tasks/{id}`
    async fn delete_task(&self, id: &TaskId) -> ApiResult<Value>;

    /// `PATCH /tasks/{id}/move`
    async fn move_task(&self, id: &TaskId, input: &MoveTaskInput) -> ApiResult<Task>;

    /// `PATCH /tasks/{id}/status`
    async fn update_status(&self, id: &TaskId, status: TaskStatus) -> ApiResult<Task>;

    /// `PATCH /tasks/{id}/priority`
    async fn update_priority(&self, id: &TaskId, priority: TaskPriority) -> ApiResult<Task>;

    /// `PATCH /tasks/{id}/assign`
    async fn assign_task(&self, id: &TaskId, assignee_id: &UserId) -> ApiResult<Task>;

    /// `PATCH /tasks/{id}/unassign`
    async fn unassign_task(&self, id: &TaskId) -> ApiResult<Task>;

    /// `POST /tasks/{id}/comments`
    async fn add_comment(&self, id: &TaskId, input: &CommentInput) -> ApiResult<Comment>;

    /// `POST /tasks/{id}/attachments` (multipart, field `file`)
    async fn upload_attachment(
        &self,
        id: &TaskId,
        upload: &AttachmentUpload,
    ) -> ApiResult<Attachment>;
}

#[derive(Debug, Clone)]
pub struct HttpTasksApi {
    client: ApiClient,
}

impl HttpTasksApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

fn attachment_form(upload: &AttachmentUpload) -> Result<Form, ClientError> {
    let mut part = Part::bytes(upload.bytes.to_vec()).file_name(upload.file_name.clone());
    if let Some(ref mime) = upload.mime_type {
        part = part
            .mime_str(mime)
            .map_err(|e| ClientError::Encode(format!("invalid mime type '{mime}': {e}")))?;
    }
    Ok(Form::new().part("file", part))
}

#[async_trait]
impl TasksApi for HttpTasksApi {
    async fn get_tasks(&self, filter: &TaskFilter) -> ApiResult<Vec<Task>> {
        typed(
            self.client
                .get_with_query("/tasks", &filter.query_pairs())
                .await,
        )
    }

    async fn get_board_tasks(&self, board_id: &BoardId) -> ApiResult<Vec<Task>> {
        typed(self.client.get(&format!("/boards/{}/tasks", segment(board_id))).await)
    }

    async fn get_task(&self, id: &TaskId) -> ApiResult<Task> {
        typed(self.client.get(&format!("/tasks/{}", segment(id))).await)
    }

    async fn create_task(&self, input: &CreateTaskInput) -> ApiResult<Task> {
        let body = encode(input)?;
        typed(self.client.post("/tasks", Some(&body)).await)
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> ApiResult<Task> {
        let body = encode(patch)?;
        typed(self.client.put(&format!("/tasks/{}", segment(id)), Some(&body)).await)
    }

    async fn delete_task(&self, id: &TaskId) -> ApiResult<Value> {
        self.client.delete(&format!("/tasks/{}", segment(id))).await
    }

    async fn move_task(&self, id: &TaskId, input: &MoveTaskInput) -> ApiResult<Task> {
        let body = encode(input)?;
        typed(
            self.client
                .patch(&format!("/tasks/{}/move", segment(id)), Some(&body))
                .await,
        )
    }

    async fn update_status(&self, id: &TaskId, status: TaskStatus) -> ApiResult<Task> {
        let body = json!({ "status": status });
        typed(
            self.client
                .patch(&format!("/tasks/{}/status", segment(id)), Some(&body))
                .await,
        )
    }

    async fn update_priority(&self, id: &TaskId, priority: TaskPriority) -> ApiResult<Task> {
        let body = json!({ "priority": priority });
        typed(
            self.client
                .patch(&format!("/tasks/{}/priority", segment(id)), Some(&body))
                .await,
        )
    }

    async fn assign_task(&self, id: &TaskId, assignee_id: &UserId) -> ApiResult<Task> {
        let body = json!({ "assigneeId": assignee_id });
        typed(
            self.client
                .patch(&format!("/tasks/{}/assign", segment(id)), Some(&body))
                .await,
        )
    }

    async fn unassign_task(&self, id: &TaskId) -> ApiResult<Task> {
        typed(
            self.client
                .patch(&format!("/tasks/{}/unassign", segment(id)), None)
                .await,
        )
    }

    async fn add_comment(&self, id: &TaskId, input: &CommentInput) -> ApiResult<Comment> {
        let body = encode(input)?;
        typed(
            self.client
                .post(&format!("/tasks/{}/comments", segment(id)), Some(&body))
                .await,
        )
    }

    async fn upload_attachment(
        &self,
        id: &TaskId,
        upload: &AttachmentUpload,
    ) -> ApiResult<Attachment> {
        let form = attachment_form(upload)?;
        typed(
            self.client
                .post_multipart(&format!("/tasks/{}/attachments", segment(id)), form)
                .await,
        )
    }
}
