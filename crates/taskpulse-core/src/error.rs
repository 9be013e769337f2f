//! Centralized error types for TaskPulse.

use thiserror::Error;

/// Main error type for task operations.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("Invalid priority {0}: expected 1 (low), 2 (medium) or 3 (high)")]
    InvalidPriority(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(#[from] taskpulse_db::DbError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for task operations.
pub type TaskResult<T> = Result<T, TaskError>;

impl TaskError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}
