//! Request payloads: create inputs, patches, move requests and filters

use super::board::{Board, BoardSettings};
use super::column::{Column, ColumnSettings};
use super::ids::{BoardId, ColumnId, UserId};
use super::task::{Subtask, Tag, Task, TaskPriority, TaskStatus, TaskType};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Payload for `POST /boards`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl CreateBoardInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            icon: None,
            color: None,
            is_public: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }
}

/// Partial board update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<BoardSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl BoardPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_archived(mut self, archived: bool) -> Self {
        self.is_archived = Some(archived);
        self
    }

    pub fn apply(&self, board: &mut Board) {
        if let Some(ref title) = self.title {
            board.title = title.clone();
        }
        if let Some(ref description) = self.description {
            board.description = description.clone();
        }
        if let Some(ref icon) = self.icon {
            board.icon = Some(icon.clone());
        }
        if let Some(ref color) = self.color {
            board.color = Some(color.clone());
        }
        if let Some(ref settings) = self.settings {
            board.settings = settings.clone();
        }
        if let Some(is_favorite) = self.is_favorite {
            board.is_favorite = is_favorite;
        }
        if let Some(is_archived) = self.is_archived {
            board.is_archived = is_archived;
        }
        if let Some(is_public) = self.is_public {
            board.is_public = is_public;
        }
    }
}

/// Every scalar field of a board the server returned; columns are left alone
impl From<&Board> for BoardPatch {
    fn from(board: &Board) -> Self {
        Self {
            title: Some(board.title.clone()),
            description: Some(board.description.clone()),
            icon: board.icon.clone(),
            color: board.color.clone(),
            settings: Some(board.settings.clone()),
            is_favorite: Some(board.is_favorite),
            is_archived: Some(board.is_archived),
            is_public: Some(board.is_public),
        }
    }
}

/// Payload for `POST /boards/{id}/columns`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<ColumnSettings>,
}

impl CreateColumnInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            icon: None,
            color: None,
            order: None,
            settings: None,
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_settings(mut self, settings: ColumnSettings) -> Self {
        self.settings = Some(settings);
        self
    }
}

/// Partial column update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_collapsed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<ColumnSettings>,
}

impl ColumnPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that only renames
    pub fn rename(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.is_collapsed = Some(collapsed);
        self
    }

    pub fn with_settings(mut self, settings: ColumnSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Whether applying this patch would change the column's title
    pub fn renames(&self, column: &Column) -> bool {
        self.title.as_ref().is_some_and(|t| t != &column.title)
    }

    pub fn apply(&self, column: &mut Column) {
        if let Some(ref title) = self.title {
            column.title = title.clone();
        }
        if let Some(ref description) = self.description {
            column.description = description.clone();
        }
        if let Some(ref icon) = self.icon {
            column.icon = Some(icon.clone());
        }
        if let Some(ref color) = self.color {
            column.color = Some(color.clone());
        }
        if let Some(order) = self.order {
            column.order = order;
        }
        if let Some(is_locked) = self.is_locked {
            column.is_locked = is_locked;
        }
        if let Some(is_collapsed) = self.is_collapsed {
            column.is_collapsed = is_collapsed;
        }
        if let Some(ref settings) = self.settings {
            column.settings = settings.clone();
        }
    }
}

/// Everything but the task list of a column the server returned
impl From<&Column> for ColumnPatch {
    fn from(column: &Column) -> Self {
        Self {
            title: Some(column.title.clone()),
            description: Some(column.description.clone()),
            icon: column.icon.clone(),
            color: column.color.clone(),
            order: Some(column.order),
            is_locked: Some(column.is_locked),
            is_collapsed: Some(column.is_collapsed),
            settings: Some(column.settings.clone()),
        }
    }
}

/// Payload for `POST /tasks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub title: String,
    pub board_id: BoardId,
    pub column_id: ColumnId,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
}

impl CreateTaskInput {
    pub fn new(
        title: impl Into<String>,
        board_id: impl Into<BoardId>,
        column_id: impl Into<ColumnId>,
    ) -> Self {
        Self {
            title: title.into(),
            board_id: board_id.into(),
            column_id: column_id.into(),
            description: String::new(),
            status: None,
            priority: None,
            task_type: None,
            assignee_id: None,
            due_date: None,
            tags: Vec::new(),
            subtasks: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<UserId>) -> Self {
        self.assignee_id = Some(assignee.into());
        self
    }

    pub fn with_due_date(mut self, due_date: i64) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial task update for `PUT /tasks/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Subtask>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_due_date(mut self, due_date: i64) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_subtasks(mut self, subtasks: Vec<Subtask>) -> Self {
        self.subtasks = Some(subtasks);
        self
    }

    /// Whether the patch introduces subtasks the task does not have yet
    pub fn adds_subtasks(&self, task: &Task) -> bool {
        self.subtasks.as_ref().is_some_and(|subtasks| {
            subtasks
                .iter()
                .any(|s| !task.subtasks.iter().any(|existing| existing.id == s.id))
        })
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(ref title) = self.title {
            task.title = title.clone();
        }
        if let Some(ref description) = self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(task_type) = self.task_type {
            task.task_type = task_type;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(start_date) = self.start_date {
            task.start_date = Some(start_date);
        }
        if let Some(hours) = self.estimated_hours {
            task.estimated_hours = Some(hours);
        }
        if let Some(hours) = self.actual_hours {
            task.actual_hours = Some(hours);
        }
        if let Some(ref tags) = self.tags {
            task.tags = tags.clone();
        }
        if let Some(ref subtasks) = self.subtasks {
            task.subtasks = subtasks.clone();
        }
        if let Some(is_pinned) = self.is_pinned {
            task.is_pinned = is_pinned;
        }
        if let Some(is_archived) = self.is_archived {
            task.is_archived = is_archived;
        }
        if let Some(is_private) = self.is_private {
            task.is_private = is_private;
        }
    }
}

/// Payload for `PATCH /tasks/{id}/move`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTaskInput {
    pub from_column_id: ColumnId,
    pub to_column_id: ColumnId,
    pub new_status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_order: Option<u32>,
}

impl MoveTaskInput {
    pub fn new(
        from_column_id: impl Into<ColumnId>,
        to_column_id: impl Into<ColumnId>,
        new_status: TaskStatus,
    ) -> Self {
        Self {
            from_column_id: from_column_id.into(),
            to_column_id: to_column_id.into(),
            new_status,
            new_order: None,
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.new_order = Some(order);
        self
    }
}

/// Payload for `POST /tasks/{id}/comments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInput {
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<UserId>,
    #[serde(default)]
    pub is_private: bool,
}

impl CommentInput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mentions: Vec::new(),
            is_private: false,
        }
    }

    pub fn with_mentions(mut self, mentions: Vec<UserId>) -> Self {
        self.mentions = mentions;
        self
    }
}

/// Query filters for `GET /tasks`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub board_id: Option<BoardId>,
    pub column_id: Option<ColumnId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<UserId>,
    pub search: Option<String>,
    pub include_archived: bool,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_board(board_id: impl Into<BoardId>) -> Self {
        Self {
            board_id: Some(board_id.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Query-string pairs in a stable order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref id) = self.board_id {
            pairs.push(("board_id", id.to_string()));
        }
        if let Some(ref id) = self.column_id {
            pairs.push(("column_id", id.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if let Some(ref id) = self.assignee_id {
            pairs.push(("assignee_id", id.to_string()));
        }
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        if self.include_archived {
            pairs.push(("include_archived", "true".to_string()));
        }
        pairs
    }
}

/// A file to upload as a task attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Bytes,
}

impl AttachmentUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_input_wire_format() {
        let input = MoveTaskInput::new("colA", "colB", TaskStatus::InProgress).with_order(2);
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fromColumnId": "colA",
                "toColumnId": "colB",
                "newStatus": "in_progress",
                "newOrder": 2
            })
        );

        let without_order = MoveTaskInput::new("colA", "colB", TaskStatus::Review);
        let json = serde_json::to_value(&without_order).unwrap();
        assert!(json.get("newOrder").is_none());
    }

    #[test]
    fn test_column_patch_renames() {
        let column = Column::new("c1", "b1", "Backlog", 0);
        assert!(ColumnPatch::rename("Later").renames(&column));
        assert!(!ColumnPatch::rename("Backlog").renames(&column));
        assert!(!ColumnPatch::new().with_collapsed(true).renames(&column));
    }

    #[test]
    fn test_board_patch_only_touches_set_fields() {
        let mut board = Board::new("b1", "Old").with_description("keep me");
        BoardPatch::new().with_title("New").apply(&mut board);
        assert_eq!(board.title, "New");
        assert_eq!(board.description, "keep me");
    }

    #[test]
    fn test_task_patch_detects_new_subtasks() {
        let mut task = Task::new("t1", "b1", "c1", "Task");
        task.subtasks.push(Subtask {
            id: "s1".into(),
            title: "existing".into(),
            is_completed: false,
        });
        let same = TaskPatch::new().with_subtasks(task.subtasks.clone());
        assert!(!same.adds_subtasks(&task));

        let mut more = task.subtasks.clone();
        more.push(Subtask {
            id: "s2".into(),
            title: "new".into(),
            is_completed: false,
        });
        assert!(TaskPatch::new().with_subtasks(more).adds_subtasks(&task));
    }

    #[test]
    fn test_filter_query_pairs() {
        let filter = TaskFilter::for_board("b1")
            .with_status(TaskStatus::Blocked)
            .with_search("login bug");
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("board_id", "b1".to_string()),
                ("status", "blocked".to_string()),
                ("search", "login bug".to_string()),
            ]
        );
    }
}
