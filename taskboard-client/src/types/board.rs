//! Board-level types: Board, BoardMember, BoardSettings, BoardStatistics

use super::column::{Column, StandardColumn};
use super::ids::{BoardId, ColumnId, TaskId, UserId};
use super::task::{Task, TaskPriority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a member on a board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Admin,
    #[default]
    Member,
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMember {
    pub user_id: UserId,
    #[serde(default)]
    pub role: MemberRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
}

/// Preferred way of rendering a board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardView {
    #[default]
    Board,
    List,
    Calendar,
}

/// Board-wide toggles governing which operations are permitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardSettings {
    pub allow_comments: bool,
    pub allow_attachments: bool,
    pub allow_task_creation: bool,
    pub is_public_board: bool,
    pub default_task_priority: TaskPriority,
    pub default_view: BoardView,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            allow_comments: true,
            allow_attachments: true,
            allow_task_creation: true,
            is_public_board: false,
            default_task_priority: TaskPriority::Medium,
            default_view: BoardView::Board,
        }
    }
}

/// Aggregate counters reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardStatistics {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub overdue_tasks: u64,
    pub members_count: u64,
    pub completion_rate: f64,
}

/// A board with its ordered columns, each owning its tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub members: Vec<BoardMember>,
    /// Display order is the order of this list
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub settings: BoardSettings,
    #[serde(default)]
    pub statistics: BoardStatistics,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Board {
    /// Create a board with no columns
    pub fn new(id: impl Into<BoardId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            icon: None,
            color: None,
            owner_id: None,
            members: Vec::new(),
            columns: Vec::new(),
            settings: BoardSettings::default(),
            statistics: BoardStatistics::default(),
            is_favorite: false,
            is_archived: false,
            is_public: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn find_column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn find_column_mut(&mut self, id: &ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| &c.id == id)
    }

    /// The column representing a standard workflow stage
    pub fn standard_column(&self, kind: StandardColumn) -> Option<&Column> {
        self.columns.iter().find(|c| c.standard_kind == Some(kind))
    }

    /// The synthetic overdue column, if the board has one
    pub fn overdue_column(&self) -> Option<&Column> {
        self.standard_column(StandardColumn::Overdue)
    }

    /// Every task on the board, in column order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.columns.iter().flat_map(|c| c.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks().find(|t| &t.id == id)
    }

    /// The column currently holding the task
    pub fn column_of_task(&self, id: &TaskId) -> Option<&Column> {
        self.columns.iter().find(|c| c.contains_task(id))
    }
}
