//! Route handlers.

pub mod health;
pub mod internal;
pub mod tasks;

use axum::http::StatusCode;
use taskpulse_core::TaskError;
use tracing::error;

/// Map a domain error onto an HTTP status and plain-text body.
pub(crate) fn error_response(e: TaskError) -> (StatusCode, String) {
    let status = match &e {
        TaskError::TaskNotFound(_) => StatusCode::NOT_FOUND,
        TaskError::ValidationError(_) | TaskError::InvalidPriority(_) => StatusCode::BAD_REQUEST,
        TaskError::Database(_) | TaskError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(error = %e, "Request failed");
    }
    (status, e.to_string())
}
