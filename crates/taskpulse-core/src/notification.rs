//! Real-time notification events.
//!
//! Events are ephemeral: they exist only on the wire and in client memory.
//! The wire encoding is a JSON object tagged by `type`:
//!
//! ```json
//! {"type": "notification", "task": {"id": 1, "title": "Ship release", "priority": 3, ...}}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::TaskResult;
use crate::task::model::Task;

/// A message pushed from the server to connected clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A high-priority task was just created.
    Notification { task: Task },
    /// Any event type this build does not know about.
    #[serde(other)]
    Unknown,
}

impl NotificationEvent {
    /// The event to publish for a freshly created task, if any.
    ///
    /// Only creations with priority exactly high produce an event.
    pub fn for_created(task: &Task) -> Option<Self> {
        task.priority.is_high().then(|| Self::Notification { task: task.clone() })
    }

    /// The embedded task, for `notification` events.
    pub fn task(&self) -> Option<&Task> {
        match self {
            Self::Notification { task } => Some(task),
            Self::Unknown => None,
        }
    }

    /// Encode as a JSON text frame.
    pub fn to_json(&self) -> TaskResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a JSON text frame.
    pub fn from_json(text: &str) -> TaskResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
