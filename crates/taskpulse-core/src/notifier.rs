//! Web server notifier for out-of-process writers.
//!
//! The CLI writes to the database directly. When it creates a high-priority
//! task it forwards the notification to a running server, which fans it out
//! to every connected client.

use std::time::Duration;
use tracing::{debug, warn};

use crate::notification::NotificationEvent;
use crate::task::model::Task;

/// Default web server URL.
pub const DEFAULT_WEB_URL: &str = "http://127.0.0.1:3030";

/// Notifies the web server of new tasks via HTTP.
#[derive(Clone)]
pub struct WebNotifier {
    client: reqwest::Client,
    base_url: String,
}

impl WebNotifier {
    /// Create a notifier targeting `base_url` (e.g. `http://127.0.0.1:3030`).
    pub fn with_url(base_url: &str) -> Self {
        debug!(base_url = %base_url, "WebNotifier initialized");
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(2))
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Forward the creation of `task` to the server.
    ///
    /// Does nothing unless the task is high priority. Returns whether the
    /// server accepted the event; failures are logged and otherwise ignored.
    pub async fn notify_task_created(&self, task: &Task) -> bool {
        let Some(event) = NotificationEvent::for_created(task) else {
            return false;
        };
        let url = format!("{}/internal/notify", self.base_url);

        debug!(url = %url, task_id = task.id, "Sending task notification");

        match self.client.post(&url).json(&event).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(task_id = task.id, "Task notification sent successfully");
                true
            }
            Ok(response) => {
                warn!(
                    task_id = task.id,
                    status_code = %response.status(),
                    "Task notification failed with status"
                );
                false
            }
            Err(e) => {
                // Expected when no server is running.
                debug!(
                    task_id = task.id,
                    error = %e,
                    url = %url,
                    "Failed to send task notification (server may not be running)"
                );
                false
            }
        }
    }
}

impl Default for WebNotifier {
    fn default() -> Self {
        Self::with_url(DEFAULT_WEB_URL)
    }
}
