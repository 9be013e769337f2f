//! TaskPulse notification client.
//!
//! Keeps one push connection to the server alive, fans decoded events out to
//! local subscribers and models the toast panel that displays them.
//!
//! The connection logic is a plain state machine ([`NotificationReceiver`])
//! that returns [`Command`]s; [`driver::run`] executes them over
//! tokio-tungstenite.

pub mod driver;
pub mod endpoint;
pub mod error;
pub mod receiver;
pub mod subscribers;
pub mod toast;

pub use endpoint::Endpoint;
pub use error::{ClientError, ClientResult};
pub use receiver::{Command, NotificationReceiver, ReceiverState, RECONNECT_DELAY};
pub use subscribers::{EventConsumer, Subscribers, Subscription};
pub use toast::{ToastPanel, MAX_VISIBLE, TOAST_LIFETIME};
