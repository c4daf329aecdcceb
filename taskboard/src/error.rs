//! Error types for the store and the crate facade

use taskboard_client::types::TaskStatus;
use taskboard_client::ClientError;
use taskboard_config::ConfigError;
use thiserror::Error;

/// Result type for crate-level operations
pub type Result<T> = std::result::Result<T, TaskboardError>;

/// A store transition that could not be applied.
///
/// Transitions validate before they mutate, so a returned error means the
/// store is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("board not found: {id}")]
    BoardNotFound { id: String },

    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// The task exists but not in the column the caller named
    #[error("task '{task}' is not in column '{column}'")]
    TaskNotInColumn { task: String, column: String },

    #[error("duplicate {item_type} ID: {id}")]
    DuplicateId { item_type: String, id: String },

    /// No standard column on the board corresponds to the status
    #[error("no column on board '{board}' holds {status} tasks")]
    NoColumnForStatus { board: String, status: TaskStatus },
}

impl StoreError {
    pub fn board_not_found(id: impl ToString) -> Self {
        Self::BoardNotFound { id: id.to_string() }
    }

    pub fn column_not_found(id: impl ToString) -> Self {
        Self::ColumnNotFound { id: id.to_string() }
    }

    pub fn task_not_found(id: impl ToString) -> Self {
        Self::TaskNotFound { id: id.to_string() }
    }

    pub fn duplicate_id(item_type: impl Into<String>, id: impl ToString) -> Self {
        Self::DuplicateId {
            item_type: item_type.into(),
            id: id.to_string(),
        }
    }

    /// Whether the error only says the store does not know an entity
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BoardNotFound { .. } | Self::ColumnNotFound { .. } | Self::TaskNotFound { .. }
        )
    }
}

/// Everything that can go wrong outside a sync operation
#[derive(Debug, Error)]
pub enum TaskboardError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::task_not_found("abc123");
        assert_eq!(err.to_string(), "task not found: abc123");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_status_in_message() {
        let err = StoreError::NoColumnForStatus {
            board: "b1".into(),
            status: TaskStatus::Blocked,
        };
        assert_eq!(err.to_string(), "no column on board 'b1' holds blocked tasks");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_wraps_client_error() {
        let err: TaskboardError = ClientError::Timeout.into();
        assert_eq!(err.to_string(), "Request timeout");
    }
}
