//! Tokio driver for [`NotificationReceiver`].
//!
//! Executes the receiver's commands over tokio-tungstenite until `shutdown`
//! resolves. Reconnection continues indefinitely at the receiver's fixed
//! delay.

use std::future::Future;

use futures::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;

use crate::receiver::{Command, NotificationReceiver};

/// Run the receiver until `shutdown` completes. Returns the receiver so the
/// caller can inspect its final state.
pub async fn run<F>(mut receiver: NotificationReceiver, shutdown: F) -> NotificationReceiver
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut next = receiver.ensure_connected();

    loop {
        match next.take() {
            Some(Command::Connect(url)) => {
                let connected = tokio::select! {
                    _ = &mut shutdown => return receiver,
                    result = connect_async(url.as_str()) => result,
                };

                let mut stream = match connected {
                    Ok((stream, _response)) => stream,
                    Err(e) => {
                        receiver.on_error(&e);
                        next = receiver.on_close();
                        continue;
                    }
                };
                receiver.on_open();

                loop {
                    let frame = tokio::select! {
                        _ = &mut shutdown => {
                            let _ = stream.close(None).await;
                            return receiver;
                        }
                        frame = stream.next() => frame,
                    };

                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            receiver.on_message(text.as_str());
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            receiver.on_error(&e);
                            break;
                        }
                    }
                }
                next = receiver.on_close();
            }
            Some(Command::ScheduleReconnect(delay)) => {
                tokio::select! {
                    _ = &mut shutdown => return receiver,
                    _ = tokio::time::sleep(delay) => {
                        next = receiver.on_reconnect_timer();
                    }
                }
            }
            None => {
                debug!(state = ?receiver.state(), "Receiver has nothing to do, stopping");
                return receiver;
            }
        }
    }
}
