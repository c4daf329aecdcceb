//! Task types: Task, Comment, Subtask, Tag, Attachment and the task enums

use super::ids::{BoardId, ColumnId, CommentId, TaskId, UserId};
use super::column::StandardColumn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a task.
///
/// `Overdue` is never a transition target chosen by a user; it is derived from
/// the due date (see `taskboard::derive::effective_status`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Planning,
    InProgress,
    Review,
    Testing,
    Completed,
    Cancelled,
    Blocked,
    OnHold,
    Overdue,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 9] = [
        Self::Planning,
        Self::InProgress,
        Self::Review,
        Self::Testing,
        Self::Completed,
        Self::Cancelled,
        Self::Blocked,
        Self::OnHold,
        Self::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Testing => "testing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Blocked => "blocked",
            Self::OnHold => "on_hold",
            Self::Overdue => "overdue",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Statuses a user may move a task to from this one.
    ///
    /// This is the task-detail workflow; the store itself accepts any status.
    pub fn allowed_transitions(&self) -> &'static [TaskStatus] {
        match self {
            Self::Planning => &[Self::InProgress],
            Self::InProgress => &[Self::Review],
            Self::Review => &[Self::InProgress, Self::Completed],
            Self::Overdue => &[Self::InProgress],
            Self::Completed => &[],
            Self::Testing | Self::Cancelled | Self::Blocked | Self::OnHold => &[],
        }
    }

    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Whether a task in this status can still become overdue
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// The standard column a task with this status lives in, if any
    pub fn standard_column(&self) -> Option<StandardColumn> {
        match self {
            Self::Planning => Some(StandardColumn::Planning),
            Self::InProgress => Some(StandardColumn::InProgress),
            Self::Review | Self::Testing => Some(StandardColumn::Review),
            Self::Completed => Some(StandardColumn::Completed),
            Self::Overdue => Some(StandardColumn::Overdue),
            Self::Cancelled | Self::Blocked | Self::OnHold => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
    Critical,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
            Self::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Task,
    Bug,
    Feature,
    Story,
    Epic,
    Subtask,
}

/// A tag attached to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// A checklist item inside a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// A file uploaded to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// One entry of a task's audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub action: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskStatistics {
    pub views: u64,
    pub comments_count: u64,
    pub attachments_count: u64,
    pub time_spent_hours: f64,
}

/// A reaction left on a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub emoji: String,
    pub user_id: UserId,
}

/// A comment in a task's discussion thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub task_id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<BoardId>,
    pub author_id: UserId,
    pub content: String,
    #[serde(default)]
    pub mentions: Vec<UserId>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub replies: Vec<Comment>,
    #[serde(default)]
    pub likes: Vec<UserId>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A task/card on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub board_id: BoardId,
    /// The one column this task currently lives in
    pub column_id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default, rename = "type")]
    pub task_type: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter_id: Option<UserId>,
    #[serde(default)]
    pub watchers: Vec<UserId>,
    #[serde(default)]
    pub collaborators: Vec<UserId>,
    /// Due date as epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    /// Start date as epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub statistics: TaskStatistics,
    /// Position within the owning column
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a task with default fields
    pub fn new(
        id: impl Into<TaskId>,
        board_id: impl Into<BoardId>,
        column_id: impl Into<ColumnId>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            board_id: board_id.into(),
            column_id: column_id.into(),
            title: title.into(),
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            task_type: TaskType::default(),
            assignee_id: None,
            reporter_id: None,
            watchers: Vec::new(),
            collaborators: Vec::new(),
            due_date: None,
            start_date: None,
            estimated_hours: None,
            actual_hours: None,
            tags: Vec::new(),
            attachments: Vec::new(),
            subtasks: Vec::new(),
            comments: Vec::new(),
            activities: Vec::new(),
            statistics: TaskStatistics::default(),
            order: 0,
            is_archived: false,
            is_pinned: false,
            is_private: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: i64) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// Fraction of completed subtasks, 0.0 when there are none
    pub fn progress(&self) -> f64 {
        if self.subtasks.is_empty() {
            return 0.0;
        }
        let done = self.subtasks.iter().filter(|s| s.is_completed).count();
        done as f64 / self.subtasks.len() as f64
    }
}
