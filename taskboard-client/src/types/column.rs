//! Column types

use super::ids::{BoardId, ColumnId, TaskId};
use super::task::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The five default columns every board is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardColumn {
    Planning,
    InProgress,
    Review,
    Completed,
    Overdue,
}

impl StandardColumn {
    pub const ALL: [StandardColumn; 5] = [
        Self::Planning,
        Self::InProgress,
        Self::Review,
        Self::Completed,
        Self::Overdue,
    ];

    /// Status a task takes on when it lands in this column
    pub fn implied_status(&self) -> TaskStatus {
        match self {
            Self::Planning => TaskStatus::Planning,
            Self::InProgress => TaskStatus::InProgress,
            Self::Review => TaskStatus::Review,
            Self::Completed => TaskStatus::Completed,
            Self::Overdue => TaskStatus::Overdue,
        }
    }

    /// English display title
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
        }
    }
}

/// Field tasks are ordered by when a column auto-sorts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Order,
    Priority,
    DueDate,
    CreatedAt,
    Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Per-column permission flags and sort preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnSettings {
    pub allow_task_creation: bool,
    pub allow_task_editing: bool,
    pub allow_task_moving: bool,
    pub allow_task_deletion: bool,
    pub allow_subtask_creation: bool,
    pub allow_comment_creation: bool,
    pub allow_attachment_upload: bool,
    pub auto_sort_tasks: bool,
    pub sort_by: SortField,
    pub sort_direction: SortDirection,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            allow_task_creation: true,
            allow_task_editing: true,
            allow_task_moving: true,
            allow_task_deletion: true,
            allow_subtask_creation: true,
            allow_comment_creation: true,
            allow_attachment_upload: true,
            auto_sort_tasks: false,
            sort_by: SortField::Order,
            sort_direction: SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnStatistics {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub overdue_tasks: u64,
}

/// A workflow stage on a board, owning its tasks while they are in memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub order: u32,
    /// Protected default column: cannot be renamed or deleted
    #[serde(default)]
    pub is_standard: bool,
    /// Which default column this is, set when the column is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_kind: Option<StandardColumn>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_collapsed: bool,
    #[serde(default)]
    pub settings: ColumnSettings,
    #[serde(default)]
    pub statistics: ColumnStatistics,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Column {
    /// Create a user column with default settings
    pub fn new(
        id: impl Into<ColumnId>,
        board_id: impl Into<BoardId>,
        title: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            board_id: board_id.into(),
            title: title.into(),
            description: String::new(),
            icon: None,
            color: None,
            order,
            is_standard: false,
            standard_kind: None,
            is_locked: false,
            is_collapsed: false,
            settings: ColumnSettings::default(),
            statistics: ColumnStatistics::default(),
            tasks: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Create one of the protected default columns
    pub fn standard(
        id: impl Into<ColumnId>,
        board_id: impl Into<BoardId>,
        kind: StandardColumn,
        order: u32,
    ) -> Self {
        let mut column = Self::new(id, board_id, kind.default_title(), order);
        column.is_standard = true;
        column.standard_kind = Some(kind);
        column
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Whether this is the synthetic overdue column
    pub fn is_overdue_column(&self) -> bool {
        self.standard_kind == Some(StandardColumn::Overdue)
    }

    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.find_task(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_to_permissive() {
        let column: Column =
            serde_json::from_str(r#"{"id": "c1", "boardId": "b1", "title": "Ideas"}"#).unwrap();
        assert!(column.settings.allow_task_creation);
        assert!(column.settings.allow_task_moving);
        assert!(!column.settings.auto_sort_tasks);
        assert!(!column.is_standard);
        assert!(column.tasks.is_empty());
    }

    #[test]
    fn test_partial_settings_keep_other_defaults() {
        let column: Column = serde_json::from_str(
            r#"{"id": "c1", "boardId": "b1", "title": "Done",
                "settings": {"allowTaskDeletion": false, "sortBy": "due_date"}}"#,
        )
        .unwrap();
        assert!(!column.settings.allow_task_deletion);
        assert!(column.settings.allow_task_editing);
        assert_eq!(column.settings.sort_by, SortField::DueDate);
    }

    #[test]
    fn test_standard_column() {
        let column = Column::standard("c-over", "b1", StandardColumn::Overdue, 4);
        assert!(column.is_standard);
        assert!(column.is_overdue_column());
        assert_eq!(column.title, "Overdue");
        assert_eq!(
            StandardColumn::Review.implied_status(),
            TaskStatus::Review
        );
    }
}
