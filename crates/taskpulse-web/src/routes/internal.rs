//! Internal notification endpoints.

use axum::{extract::State, http::StatusCode, Json};
use taskpulse_core::NotificationEvent;
use tracing::{debug, info};

use crate::state::AppState;

/// Receive a notification from another process and broadcast it to all
/// WebSocket clients.
///
/// Only `notification` events for high-priority tasks are accepted.
pub async fn notify(
    State(state): State<AppState>,
    Json(event): Json<NotificationEvent>,
) -> StatusCode {
    let Some(task) = event.task().filter(|t| t.priority.is_high()) else {
        debug!(?event, "Rejected internal notification");
        return StatusCode::BAD_REQUEST;
    };

    info!(task_id = task.id, "Received internal notification, broadcasting to WebSocket clients");
    let report = state.registry.broadcast(&event);
    debug!(delivered = report.delivered, skipped = report.skipped, "Internal notification fan-out");
    StatusCode::OK
}
