//! Connection state machine for the notification channel.
//!
//! The receiver performs no I/O. Each transport event is fed in through an
//! `on_*` method, and any follow-up work is returned as a [`Command`] for the
//! caller to execute. At most one connection and at most one pending
//! reconnection exist at any time.

use std::fmt::Display;
use std::time::Duration;

use taskpulse_core::NotificationEvent;
use tracing::{debug, error, info, warn};

use crate::endpoint::Endpoint;
use crate::subscribers::{EventConsumer, Subscribers, Subscription};

/// Fixed delay between a close and the next connection attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Where the receiver is in its connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    /// Never connected.
    Idle,
    /// A connection attempt is in flight.
    Connecting,
    /// Connected; frames are being received.
    Open,
    /// Disconnected, with one reconnection timer armed.
    ReconnectPending,
}

/// Work the caller must perform on the receiver's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a WebSocket to this URL, then report `on_open` or `on_error` + `on_close`.
    Connect(String),
    /// Call `on_reconnect_timer` after this delay.
    ScheduleReconnect(Duration),
}

pub struct NotificationReceiver {
    url: String,
    state: ReceiverState,
    reconnect_delay: Duration,
    subscribers: Subscribers,
}

impl NotificationReceiver {
    pub fn new(endpoint: &Endpoint) -> Self {
        Self {
            url: endpoint.url(),
            state: ReceiverState::Idle,
            reconnect_delay: RECONNECT_DELAY,
            subscribers: Subscribers::new(),
        }
    }

    /// Override the reconnection delay.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn state(&self) -> ReceiverState {
        self.state
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Shared handle to the subscriber list.
    pub fn subscribers(&self) -> &Subscribers {
        &self.subscribers
    }

    pub fn subscribe<C>(&self, consumer: C) -> Subscription
    where
        C: EventConsumer + 'static,
    {
        self.subscribers.subscribe(consumer)
    }

    /// Start connecting unless a connection is already open or in flight.
    ///
    /// Calling this while a reconnection is pending connects immediately and
    /// disarms the pending timer.
    pub fn ensure_connected(&mut self) -> Option<Command> {
        match self.state {
            ReceiverState::Open | ReceiverState::Connecting => None,
            ReceiverState::Idle | ReceiverState::ReconnectPending => {
                debug!(url = %self.url, "Connecting to notification endpoint");
                self.state = ReceiverState::Connecting;
                Some(Command::Connect(self.url.clone()))
            }
        }
    }

    /// The transport finished its handshake.
    pub fn on_open(&mut self) {
        if self.state != ReceiverState::Connecting {
            warn!(state = ?self.state, "Unexpected open event");
        }
        info!(url = %self.url, "Notification channel connected");
        self.state = ReceiverState::Open;
    }

    /// A text frame arrived. Returns the number of subscribers invoked.
    ///
    /// Frames that do not decode are logged and dropped.
    pub fn on_message(&self, text: &str) -> usize {
        match NotificationEvent::from_json(text) {
            Ok(event) => self.subscribers.dispatch(&event),
            Err(e) => {
                error!(error = %e, "Error parsing notification message");
                0
            }
        }
    }

    /// The transport reported an error. Reconnection waits for the close
    /// that follows.
    pub fn on_error(&self, err: &dyn Display) {
        error!(error = %err, "Notification channel error");
    }

    /// The connection closed (or never opened).
    ///
    /// Arms a reconnection timer unless one is already pending.
    pub fn on_close(&mut self) -> Option<Command> {
        match self.state {
            ReceiverState::Open | ReceiverState::Connecting => {
                info!(
                    delay_secs = self.reconnect_delay.as_secs_f64(),
                    "Notification channel disconnected, scheduling reconnect"
                );
                self.state = ReceiverState::ReconnectPending;
                Some(Command::ScheduleReconnect(self.reconnect_delay))
            }
            ReceiverState::ReconnectPending | ReceiverState::Idle => None,
        }
    }

    /// The reconnection timer fired.
    ///
    /// Stale timers (the receiver reconnected in the meantime) are ignored.
    pub fn on_reconnect_timer(&mut self) -> Option<Command> {
        match self.state {
            ReceiverState::ReconnectPending => self.ensure_connected(),
            _ => None,
        }
    }
}
