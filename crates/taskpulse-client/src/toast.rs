//! Toast panel model.
//!
//! Holds the notifications currently on screen. Time is supplied by the
//! caller so the panel can be driven by any clock.

use std::time::{Duration, Instant};

use taskpulse_core::{NotificationEvent, Task};

/// Most toasts shown at once.
pub const MAX_VISIBLE: usize = 3;

/// How long a toast stays up unless dismissed.
pub const TOAST_LIFETIME: Duration = Duration::from_secs(8);

#[derive(Debug, Default)]
pub struct ToastPanel {
    /// Newest first.
    visible: Vec<Task>,
    /// Removal deadlines by task id, one per shown event.
    timers: Vec<(Instant, i64)>,
}

impl ToastPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the task carried by a `notification` event. Other events are
    /// ignored. Returns whether a toast was added.
    pub fn on_event(&mut self, event: &NotificationEvent, now: Instant) -> bool {
        match event.task() {
            Some(task) => {
                self.show(task.clone(), now);
                true
            }
            None => false,
        }
    }

    /// Prepend a toast and arm its removal timer.
    pub fn show(&mut self, task: Task, now: Instant) {
        self.timers.push((now + TOAST_LIFETIME, task.id));
        self.visible.insert(0, task);
        self.visible.truncate(MAX_VISIBLE);
    }

    /// Remove a toast right away. Returns `false` if it was not visible.
    pub fn dismiss(&mut self, task_id: i64) -> bool {
        let before = self.visible.len();
        self.visible.retain(|t| t.id != task_id);
        self.visible.len() != before
    }

    /// Fire every timer due at `now`. Returns the toasts that were removed.
    pub fn expire(&mut self, now: Instant) -> Vec<Task> {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|(deadline, _)| *deadline <= now);
        self.timers = pending;

        let mut removed = Vec::new();
        for (_, id) in due {
            let (gone, kept): (Vec<_>, Vec<_>) =
                std::mem::take(&mut self.visible).into_iter().partition(|t| t.id == id);
            self.visible = kept;
            removed.extend(gone);
        }
        removed
    }

    /// Visible tasks, newest first.
    pub fn visible(&self) -> &[Task] {
        &self.visible
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Earliest armed timer, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|(deadline, _)| *deadline).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskpulse_core::Priority;

    fn task(id: i64, title: &str) -> Task {
        let now = Utc::now();
        Task {
            id,
            title: title.to_string(),
            description: None,
            priority: Priority::High,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn titles(panel: &ToastPanel) -> Vec<&str> {
        panel.visible().iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_keeps_three_most_recent() {
        let mut panel = ToastPanel::new();
        let t0 = Instant::now();
        for (id, title) in [(1, "A"), (2, "B"), (3, "C"), (4, "D")] {
            panel.show(task(id, title), t0);
        }
        assert_eq!(titles(&panel), vec!["D", "C", "B"]);
    }

    #[test]
    fn test_expires_after_lifetime() {
        let mut panel = ToastPanel::new();
        let t0 = Instant::now();
        panel.show(task(1, "A"), t0);
        panel.show(task(2, "B"), t0 + Duration::from_secs(3));

        assert!(panel.expire(t0 + Duration::from_secs(7)).is_empty());
        assert_eq!(panel.next_deadline(), Some(t0 + TOAST_LIFETIME));

        let removed = panel.expire(t0 + TOAST_LIFETIME);
        assert_eq!(removed.len(), 1);
        assert_eq!(titles(&panel), vec!["B"]);

        panel.expire(t0 + Duration::from_secs(11));
        assert!(panel.is_empty());
        assert_eq!(panel.next_deadline(), None);
    }

    #[test]
    fn test_dismiss_then_timer_is_harmless() {
        let mut panel = ToastPanel::new();
        let t0 = Instant::now();
        panel.show(task(1, "A"), t0);
        panel.show(task(2, "B"), t0);

        assert!(panel.dismiss(1));
        assert!(!panel.dismiss(1));
        assert_eq!(titles(&panel), vec!["B"]);

        // A's timer still fires and finds nothing to remove
        let removed = panel.expire(t0 + TOAST_LIFETIME);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, 2);
        assert!(panel.is_empty());
    }

    #[test]
    fn test_truncated_toast_timer_does_not_touch_others() {
        let mut panel = ToastPanel::new();
        let t0 = Instant::now();
        panel.show(task(1, "A"), t0);
        for (id, title) in [(2, "B"), (3, "C"), (4, "D")] {
            panel.show(task(id, title), t0 + Duration::from_secs(2));
        }

        assert!(panel.expire(t0 + TOAST_LIFETIME).is_empty());
        assert_eq!(titles(&panel), vec!["D", "C", "B"]);
    }

    #[test]
    fn test_ignores_unknown_events() {
        let mut panel = ToastPanel::new();
        let now = Instant::now();
        assert!(!panel.on_event(&NotificationEvent::Unknown, now));
        assert!(panel.on_event(
            &NotificationEvent::Notification { task: task(9, "Z") },
            now
        ));
        assert_eq!(titles(&panel), vec!["Z"]);
    }
}
