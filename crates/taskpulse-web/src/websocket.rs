//! WebSocket handler for real-time notifications.
//!
//! The channel is push-only: frames from the client are read (so close and
//! ping frames are processed) and otherwise ignored.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tracing::{debug, info};

use crate::registry::Connection;
use crate::state::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let Connection { id, mut outbox } = state.registry.register();

    // Forward broadcast frames to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outbox.recv().await {
            if sender.send(Message::Text(frame.to_string().into())).await.is_err() {
                debug!(%id, "WebSocket send failed, client disconnected");
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    debug!(%id, "Ignoring message from WebSocket client: {}", text.as_str());
                }
                Message::Close(_) => {
                    debug!(%id, "WebSocket client sent close frame");
                    break;
                }
                _ => {}
            }
        }
    });

    state.registry.mark_open(id);
    info!(%id, connections = state.registry.len(), "WebSocket client connected");

    // Whichever side finishes first ends the connection
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.registry.unregister(id);
    info!(%id, connections = state.registry.len(), "WebSocket client disconnected");
}
