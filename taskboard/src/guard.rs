//! Local checks that reject an operation before any request is sent
//!
//! Every function here is pure: it looks at the entities currently in the
//! store and either lets the operation through or names why it cannot run.

use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_client::types::{Board, Column, ColumnPatch, Task, TaskPatch};
use thiserror::Error;

/// Something a column's settings can forbid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAction {
    TaskCreation,
    TaskEditing,
    TaskMoving,
    TaskDeletion,
    SubtaskCreation,
    CommentCreation,
    AttachmentUpload,
}

impl ColumnAction {
    /// Whether the column's settings permit this action
    pub fn allowed_by(&self, column: &Column) -> bool {
        let settings = &column.settings;
        match self {
            Self::TaskCreation => settings.allow_task_creation,
            Self::TaskEditing => settings.allow_task_editing,
            Self::TaskMoving => settings.allow_task_moving,
            Self::TaskDeletion => settings.allow_task_deletion,
            Self::SubtaskCreation => settings.allow_subtask_creation,
            Self::CommentCreation => settings.allow_comment_creation,
            Self::AttachmentUpload => settings.allow_attachment_upload,
        }
    }
}

impl fmt::Display for ColumnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TaskCreation => "task creation",
            Self::TaskEditing => "task editing",
            Self::TaskMoving => "moving tasks",
            Self::TaskDeletion => "task deletion",
            Self::SubtaskCreation => "subtask creation",
            Self::CommentCreation => "comments",
            Self::AttachmentUpload => "attachment uploads",
        })
    }
}

/// Why an operation was refused locally
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardRejection {
    #[error("standard column '{title}' cannot be renamed")]
    StandardColumnRename { title: String },

    #[error("standard column '{title}' cannot be deleted")]
    StandardColumnDelete { title: String },

    #[error("column '{title}' has {count} tasks and cannot be deleted")]
    ColumnNotEmpty { title: String, count: usize },

    #[error("column '{title}' does not allow {action}")]
    ColumnPermission { title: String, action: ColumnAction },

    #[error("column '{title}' is locked")]
    ColumnLocked { title: String },

    #[error("board '{title}' does not allow {what}")]
    BoardPermission { title: String, what: String },

    #[error("{field} is required")]
    Required { field: String },

    /// The typed title cannot be checked against a board the store lacks
    #[error("board '{id}' is not loaded; load boards before deleting it")]
    UnknownBoard { id: String },

    #[error("typed title does not match board '{title}'")]
    ConfirmationMismatch { title: String },

    #[error("'{title}' is your only board; confirm again to delete it")]
    LastBoardNeedsConfirmation { title: String },
}

impl GuardRejection {
    pub fn required(field: impl Into<String>) -> Self {
        Self::Required {
            field: field.into(),
        }
    }
}

/// Reject blank required text
pub fn require_text(field: &str, value: &str) -> Result<(), GuardRejection> {
    if value.trim().is_empty() {
        return Err(GuardRejection::required(field));
    }
    Ok(())
}

fn require_column_action(column: &Column, action: ColumnAction) -> Result<(), GuardRejection> {
    if !action.allowed_by(column) {
        return Err(GuardRejection::ColumnPermission {
            title: column.title.clone(),
            action,
        });
    }
    Ok(())
}

fn require_unlocked(column: &Column) -> Result<(), GuardRejection> {
    if column.is_locked {
        return Err(GuardRejection::ColumnLocked {
            title: column.title.clone(),
        });
    }
    Ok(())
}

/// Standard columns keep their title; a blank title is never accepted
pub fn check_column_update(column: &Column, patch: &ColumnPatch) -> Result<(), GuardRejection> {
    if column.is_standard && patch.renames(column) {
        return Err(GuardRejection::StandardColumnRename {
            title: column.title.clone(),
        });
    }
    if let Some(ref title) = patch.title {
        require_text("column title", title)?;
    }
    Ok(())
}

/// Only empty, non-standard columns can be deleted
pub fn check_column_delete(column: &Column) -> Result<(), GuardRejection> {
    if column.is_standard {
        return Err(GuardRejection::StandardColumnDelete {
            title: column.title.clone(),
        });
    }
    if !column.tasks.is_empty() {
        return Err(GuardRejection::ColumnNotEmpty {
            title: column.title.clone(),
            count: column.tasks.len(),
        });
    }
    Ok(())
}

pub fn check_task_creation(
    board: &Board,
    column: &Column,
    title: &str,
) -> Result<(), GuardRejection> {
    require_text("task title", title)?;
    if !board.settings.allow_task_creation {
        return Err(GuardRejection::BoardPermission {
            title: board.title.clone(),
            what: "task creation".into(),
        });
    }
    require_unlocked(column)?;
    require_column_action(column, ColumnAction::TaskCreation)
}

/// Both ends of a move must permit moving; locked columns hold their tasks
pub fn check_task_move(from: &Column, to: &Column) -> Result<(), GuardRejection> {
    require_unlocked(from)?;
    require_column_action(from, ColumnAction::TaskMoving)?;
    if from.id != to.id {
        require_unlocked(to)?;
        require_column_action(to, ColumnAction::TaskMoving)?;
    }
    Ok(())
}

pub fn check_task_update(
    column: &Column,
    task: &Task,
    patch: &TaskPatch,
) -> Result<(), GuardRejection> {
    require_column_action(column, ColumnAction::TaskEditing)?;
    if let Some(ref title) = patch.title {
        require_text("task title", title)?;
    }
    if patch.adds_subtasks(task) {
        require_column_action(column, ColumnAction::SubtaskCreation)?;
    }
    Ok(())
}

/// Single-field edits (status, priority, assignee) count as editing
pub fn check_task_edit(column: &Column) -> Result<(), GuardRejection> {
    require_column_action(column, ColumnAction::TaskEditing)
}

pub fn check_task_delete(column: &Column) -> Result<(), GuardRejection> {
    require_column_action(column, ColumnAction::TaskDeletion)
}

pub fn check_comment(board: &Board, column: &Column, content: &str) -> Result<(), GuardRejection> {
    require_text("comment", content)?;
    if !board.settings.allow_comments {
        return Err(GuardRejection::BoardPermission {
            title: board.title.clone(),
            what: "comments".into(),
        });
    }
    require_column_action(column, ColumnAction::CommentCreation)
}

pub fn check_attachment(board: &Board, column: &Column) -> Result<(), GuardRejection> {
    if !board.settings.allow_attachments {
        return Err(GuardRejection::BoardPermission {
            title: board.title.clone(),
            what: "attachments".into(),
        });
    }
    require_column_action(column, ColumnAction::AttachmentUpload)
}

/// What the user typed and confirmed before deleting a board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDeletion {
    /// Must equal the board title exactly
    pub typed_title: String,
    /// Second confirmation, required when deleting the user's only board
    pub confirmed_last_board: bool,
}

impl BoardDeletion {
    pub fn new(typed_title: impl Into<String>) -> Self {
        Self {
            typed_title: typed_title.into(),
            confirmed_last_board: false,
        }
    }

    pub fn confirm_last_board(mut self) -> Self {
        self.confirmed_last_board = true;
        self
    }
}

/// `board_count` is the number of boards the user currently has
pub fn check_board_delete(
    board: &Board,
    deletion: &BoardDeletion,
    board_count: usize,
) -> Result<(), GuardRejection> {
    if deletion.typed_title != board.title {
        return Err(GuardRejection::ConfirmationMismatch {
            title: board.title.clone(),
        });
    }
    if board_count <= 1 && !deletion.confirmed_last_board {
        return Err(GuardRejection::LastBoardNeedsConfirmation {
            title: board.title.clone(),
        });
    }
    Ok(())
}
