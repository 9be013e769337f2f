//! TaskPulse Core Library
//!
//! Domain model and business rules for tasks and their real-time
//! notifications.

pub mod error;
pub mod notification;
pub mod notifier;
pub mod task;

pub use error::{TaskError, TaskResult};
pub use notification::NotificationEvent;
pub use task::model::{Priority, Task};
