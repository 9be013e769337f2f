//! Application state.

use std::sync::Arc;

use taskpulse_core::{NotificationEvent, Task};
use taskpulse_db::DbPool;
use tracing::info;

use crate::registry::{BroadcastReport, ConnectionRegistry};

/// Application state shared across handlers.
///
/// The registry lives exactly as long as the router that owns this state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub registry: Arc<ConnectionRegistry>,
}

impl AppState {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            db,
            registry: Arc::new(ConnectionRegistry::new()),
        }
    }

    /// Publish a just-created task to every connected client if it qualifies.
    ///
    /// Returns `None` when the task does not trigger a notification.
    pub fn notify_created(&self, task: &Task) -> Option<BroadcastReport> {
        let event = NotificationEvent::for_created(task)?;
        let report = self.registry.broadcast(&event);
        info!(
            task_id = task.id,
            delivered = report.delivered,
            skipped = report.skipped,
            "High priority task broadcast"
        );
        Some(report)
    }
}
