//! End-to-end checks of the notification channel over real sockets.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use serde_json::{json, Value};
use taskpulse_web::{serve, AppState};
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn start_server() -> (String, AppState, tokio::sync::oneshot::Sender<()>) {
    let db = Arc::new(taskpulse_db::init_memory_pool().unwrap());
    let state = AppState::new(db);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server_state = state.clone();
    tokio::spawn(async move {
        serve(listener, server_state, async {
            let _ = stop_rx.await;
        })
        .await
        .unwrap();
    });

    (addr, state, stop_tx)
}

async fn connect(addr: &str, state: &AppState, expected: usize) -> Client {
    let (client, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    // Registration happens on the server after the handshake completes
    for _ in 0..100 {
        if state.registry.len() >= expected {
            return client;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("connection was never registered");
}

async fn next_text(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for notification")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn create(addr: &str, body: Value) -> Value {
    let response = reqwest::Client::new()
        .post(format!("http://{}/api/tasks", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn high_priority_task_reaches_every_open_connection() {
    let (addr, state, _stop) = start_server().await;
    let mut first = connect(&addr, &state, 1).await;
    let mut second = connect(&addr, &state, 2).await;

    let created = create(&addr, json!({ "title": "Ship release", "priority": 3 })).await;
    assert_eq!(created["priority"], 3);

    for client in [&mut first, &mut second] {
        let frame = next_text(client).await;
        assert_eq!(frame["type"], "notification");
        assert_eq!(frame["task"], created);
    }
}

#[tokio::test]
async fn low_priority_task_sends_nothing() {
    let (addr, state, _stop) = start_server().await;
    let mut client = connect(&addr, &state, 1).await;

    let milk = create(&addr, json!({ "title": "Buy milk", "priority": 1 })).await;
    assert_eq!(milk["title"], "Buy milk");

    // The next frame on the wire must belong to the later high-priority task
    let urgent = create(&addr, json!({ "title": "Page on-call", "priority": 3 })).await;
    let frame = next_text(&mut client).await;
    assert_eq!(frame["task"]["id"], urgent["id"]);
}

#[tokio::test]
async fn closed_connection_is_unregistered() {
    let (addr, state, _stop) = start_server().await;
    let mut client = connect(&addr, &state, 1).await;
    client.close(None).await.unwrap();

    for _ in 0..100 {
        if state.registry.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(state.registry.is_empty());

    // Broadcasting with nobody listening still succeeds
    create(&addr, json!({ "title": "Nobody home", "priority": 3 })).await;
}
