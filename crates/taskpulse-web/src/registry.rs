//! Connection registry and notification fan-out.
//!
//! Every WebSocket connection owns a bounded outbox drained by its writer
//! task. Broadcasting snapshots the open members under a read lock, then
//! offers the encoded frame to each outbox with `try_send`, so a broadcast
//! never waits on a slow or dead client.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use taskpulse_core::NotificationEvent;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Frames buffered per connection before new ones are dropped.
const OUTBOX_CAPACITY: usize = 64;

/// Identifier of a registered connection.
pub type ConnectionId = Uuid;

/// Lifecycle of a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Registered, writer not yet running.
    Connecting,
    /// Eligible for broadcasts.
    Open,
    /// Unregistered.
    Closed,
}

/// Receiving side handed to the connection's writer task.
pub struct Connection {
    pub id: ConnectionId,
    pub outbox: mpsc::Receiver<Arc<str>>,
}

struct Member {
    state: ConnectionState,
    tx: mpsc::Sender<Arc<str>>,
}

/// Outcome of one broadcast, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Frames handed to an open connection.
    pub delivered: usize,
    /// Open connections whose outbox was full or already gone.
    pub skipped: usize,
}

/// The set of live real-time connections.
#[derive(Default)]
pub struct ConnectionRegistry {
    members: RwLock<HashMap<ConnectionId, Member>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new connection in the `Connecting` state.
    pub fn register(&self) -> Connection {
        let (tx, outbox) = mpsc::channel(OUTBOX_CAPACITY);
        let id = Uuid::new_v4();
        let member = Member {
            state: ConnectionState::Connecting,
            tx,
        };
        self.members
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, member);
        debug!(%id, "Connection registered");
        Connection { id, outbox }
    }

    /// Move a connection to `Open`. Returns `false` if it is no longer registered.
    pub fn mark_open(&self, id: ConnectionId) -> bool {
        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        match members.get_mut(&id) {
            Some(member) => {
                member.state = ConnectionState::Open;
                true
            }
            None => false,
        }
    }

    /// Remove a connection. Idempotent: returns `true` only for the call
    /// that actually removed it.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        let removed = self
            .members
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some();
        if removed {
            debug!(%id, "Connection unregistered");
        }
        removed
    }

    /// Current state of a connection; unknown ids are `Closed`.
    pub fn state(&self, id: ConnectionId) -> ConnectionState {
        self.members
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .map_or(ConnectionState::Closed, |m| m.state)
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.members.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Send `event` to every open connection, best-effort.
    ///
    /// Connections registered after the snapshot is taken do not receive the
    /// event. Failures are logged per connection and never returned.
    pub fn broadcast(&self, event: &NotificationEvent) -> BroadcastReport {
        let frame: Arc<str> = match event.to_json() {
            Ok(json) => json.into(),
            Err(e) => {
                warn!(error = %e, "Failed to encode notification, dropping it");
                return BroadcastReport::default();
            }
        };

        let targets: Vec<(ConnectionId, mpsc::Sender<Arc<str>>)> = self
            .members
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(_, m)| m.state == ConnectionState::Open)
            .map(|(id, m)| (*id, m.tx.clone()))
            .collect();

        let mut report = BroadcastReport::default();
        for (id, tx) in targets {
            match tx.try_send(Arc::clone(&frame)) {
                Ok(()) => report.delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(%id, "Connection outbox full, notification skipped");
                    report.skipped += 1;
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(%id, "Connection already closed, notification skipped");
                    report.skipped += 1;
                }
            }
        }

        debug!(
            delivered = report.delivered,
            skipped = report.skipped,
            "Notification broadcast"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskpulse_core::{Priority, Task};

    fn event(id: i64) -> NotificationEvent {
        let now = Utc::now();
        NotificationEvent::Notification {
            task: Task {
                id,
                title: format!("task {}", id),
                description: None,
                priority: Priority::High,
                completed: false,
                created_at: now,
                updated_at: now,
            },
        }
    }

    fn open(registry: &ConnectionRegistry) -> Connection {
        let conn = registry.register();
        assert!(registry.mark_open(conn.id));
        conn
    }

    #[test]
    fn test_broadcast_reaches_each_open_connection_once() {
        let registry = ConnectionRegistry::new();
        let mut a = open(&registry);
        let mut b = open(&registry);

        let report = registry.broadcast(&event(1));
        assert_eq!(report, BroadcastReport { delivered: 2, skipped: 0 });

        for conn in [&mut a, &mut b] {
            let frame = conn.outbox.try_recv().unwrap();
            let decoded = NotificationEvent::from_json(&frame).unwrap();
            assert_eq!(decoded.task().unwrap().id, 1);
            assert!(conn.outbox.try_recv().is_err());
        }
    }

    #[test]
    fn test_connecting_members_are_skipped() {
        let registry = ConnectionRegistry::new();
        let mut pending = registry.register();
        assert_eq!(registry.state(pending.id), ConnectionState::Connecting);

        let report = registry.broadcast(&event(1));
        assert_eq!(report.delivered, 0);
        assert!(pending.outbox.try_recv().is_err());
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let conn = open(&registry);
        assert_eq!(registry.state(conn.id), ConnectionState::Open);

        assert!(registry.unregister(conn.id));
        assert!(!registry.unregister(conn.id));
        assert_eq!(registry.state(conn.id), ConnectionState::Closed);
        assert!(!registry.mark_open(conn.id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dead_connection_does_not_stop_fan_out() {
        let registry = ConnectionRegistry::new();
        let dead = open(&registry);
        let mut alive = open(&registry);
        drop(dead.outbox);

        let report = registry.broadcast(&event(2));
        assert_eq!(report, BroadcastReport { delivered: 1, skipped: 1 });
        assert!(alive.outbox.try_recv().is_ok());
    }

    #[test]
    fn test_full_outbox_drops_instead_of_blocking() {
        let registry = ConnectionRegistry::new();
        let mut slow = open(&registry);

        for i in 0..OUTBOX_CAPACITY as i64 {
            assert_eq!(registry.broadcast(&event(i)).delivered, 1);
        }
        let report = registry.broadcast(&event(999));
        assert_eq!(report, BroadcastReport { delivered: 0, skipped: 1 });

        let first = slow.outbox.try_recv().unwrap();
        assert_eq!(
            NotificationEvent::from_json(&first).unwrap().task().unwrap().id,
            0
        );
    }

    #[test]
    fn test_broadcast_order_follows_call_order() {
        let registry = ConnectionRegistry::new();
        let mut conn = open(&registry);
        for i in 1..=3 {
            registry.broadcast(&event(i));
        }
        let ids: Vec<i64> = (0..3)
            .map(|_| {
                let frame = conn.outbox.try_recv().unwrap();
                NotificationEvent::from_json(&frame).unwrap().task().unwrap().id
            })
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_concurrent_registration_and_broadcast() {
        let registry = Arc::new(ConnectionRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let conn = open(&registry);
                    registry.broadcast(&event(i));
                    registry.unregister(conn.id)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert!(registry.is_empty());
    }
}
