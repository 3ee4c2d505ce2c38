//! Live WebSocket scenarios over a real listener

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::common::LiveApp;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const QUIET_PERIOD: Duration = Duration::from_millis(300);
const WAIT: Duration = Duration::from_secs(5);

async fn connect(app: &LiveApp) -> Socket {
    let (socket, _) = connect_async(app.socket_url()).await.expect("Failed to connect");
    socket
}

/// Next text frame, skipping control frames
async fn next_text(socket: &mut Socket) -> String {
    loop {
        let message = timeout(WAIT, socket.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Socket closed")
            .expect("Socket error");
        if let Message::Text(text) = message {
            return text.to_string();
        }
    }
}

async fn send(socket: &mut Socket, payload: &str) {
    socket.send(Message::Text(payload.into())).await.expect("Failed to send");
}

async fn assert_silent(socket: &mut Socket) {
    if let Ok(Some(Ok(Message::Text(text)))) = timeout(QUIET_PERIOD, socket.next()).await {
        panic!("Expected no frame, got {text:?}");
    }
}

async fn wait_for_sessions(app: &LiveApp, expected: usize) {
    timeout(WAIT, async {
        while app.state.registry.session_count().await != expected {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("Session count never reached the expected value");
}

async fn create_instance(app: &LiveApp) {
    let response = reqwest::Client::new()
        .post(app.http_url("/api/instance"))
        .bearer_auth(&app.user.token)
        .json(&json!({"name": "music", "host": "ts.example.com", "port": 9987}))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
}

#[tokio::test]
async fn test_upgrade_requires_token() {
    let app = LiveApp::start().await;
    let url = format!("ws://{}/socket", app.addr);
    assert!(connect_async(url).await.is_err());
}

#[tokio::test]
async fn test_only_subscribers_are_notified() {
    let app = LiveApp::start().await;
    let mut a = connect(&app).await;
    let mut b = connect(&app).await;
    wait_for_sessions(&app, 2).await;

    send(&mut a, "SUBSCRIBE\n\n/api/instance").await;
    assert_eq!(next_text(&mut a).await, "OK\n\n");
    send(&mut b, "SUBSCRIBE\n\n/api/user").await;
    assert_eq!(next_text(&mut b).await, "OK\n\n");

    create_instance(&app).await;

    assert_eq!(next_text(&mut a).await, "UPDATE\n\n/api/instance");
    assert_silent(&mut a).await;
    assert_silent(&mut b).await;
}

#[tokio::test]
async fn test_unsubscribe_stops_updates() {
    let app = LiveApp::start().await;
    let mut socket = connect(&app).await;

    send(&mut socket, "SUBSCRIBE\n\n/api/instance").await;
    assert_eq!(next_text(&mut socket).await, "OK\n\n");
    send(&mut socket, "DESUB\n\n/api/instance").await;
    assert_eq!(next_text(&mut socket).await, "OK\n\n");

    create_instance(&app).await;
    assert_silent(&mut socket).await;
}

#[tokio::test]
async fn test_malformed_frames_get_bad_and_stay_connected() {
    let app = LiveApp::start().await;
    let mut socket = connect(&app).await;

    send(&mut socket, "SUBSCRIBE /api/user").await;
    assert_eq!(next_text(&mut socket).await, "BAD\n\nSUBSCRIBE /api/user");

    send(&mut socket, "PUBLISH\n\n/api/user").await;
    assert_eq!(next_text(&mut socket).await, "BAD\n\nPUBLISH\n\n/api/user");

    socket
        .send(Message::Binary(b"SUBSCRIBE\n\n/api/user".to_vec().into()))
        .await
        .unwrap();
    assert_eq!(next_text(&mut socket).await, "BAD\n\nSUBSCRIBE\n\n/api/user");

    send(&mut socket, "SUBSCRIBE\n\n/api/user").await;
    assert_eq!(next_text(&mut socket).await, "OK\n\n");
}

#[tokio::test]
async fn test_normal_close_removes_session() {
    let app = LiveApp::start().await;
    let mut socket = connect(&app).await;
    wait_for_sessions(&app, 1).await;

    socket.close(None).await.unwrap();
    wait_for_sessions(&app, 0).await;
}

#[tokio::test]
async fn test_abnormal_close_removes_session() {
    let app = LiveApp::start().await;
    let mut a = connect(&app).await;
    let mut b = connect(&app).await;
    wait_for_sessions(&app, 2).await;

    send(&mut a, "SUBSCRIBE\n\n/api/instance").await;
    assert_eq!(next_text(&mut a).await, "OK\n\n");
    send(&mut b, "SUBSCRIBE\n\n/api/instance").await;
    assert_eq!(next_text(&mut b).await, "OK\n\n");
    assert_eq!(app.state.registry.subscribers("/api/instance").await.len(), 2);

    a.close(Some(CloseFrame {
        code: CloseCode::from(4000),
        reason: "going away".into(),
    }))
    .await
    .unwrap();
    wait_for_sessions(&app, 1).await;

    // only the remaining session is still subscribed
    assert_eq!(app.state.registry.subscribers("/api/instance").await.len(), 1);

    create_instance(&app).await;
    assert_eq!(next_text(&mut b).await, "UPDATE\n\n/api/instance");
    assert_eq!(app.state.notifier.notify("/api/instance").await, 1);
}

#[tokio::test]
async fn test_dropped_transport_removes_session() {
    let app = LiveApp::start().await;
    let socket = connect(&app).await;
    wait_for_sessions(&app, 1).await;

    drop(socket);
    wait_for_sessions(&app, 0).await;
}
