//! Instance start/stop against a mocked daemon

use std::future::IntoFuture;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yamba_management::backend::realtime::SessionId;

use crate::common::TestApp;

async fn create_instance(app: &TestApp) -> i64 {
    let instance: Value = app
        .server
        .post("/api/instance")
        .authorization_bearer(app.token())
        .json(&json!({"name": "music", "host": "ts.example.com", "port": 9987, "cid": 2}))
        .await
        .json();
    instance["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_start_and_stop_instance() {
    let daemon = MockServer::start().await;
    let app = TestApp::with_daemon(&daemon.uri()).await;
    let id = create_instance(&app).await;

    Mock::given(method("POST"))
        .and(path("/instance/start"))
        .and(body_partial_json(json!({
            "id": id,
            "data": {"TS": {"host": "ts.example.com", "port": 9987, "cid": 2, "name": "music"}}
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&daemon)
        .await;
    Mock::given(method("POST"))
        .and(path("/instance/stop"))
        .and(body_partial_json(json!({"id": id})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&daemon)
        .await;

    let started = app
        .server
        .put(&format!("/api/instance/{id}/start"))
        .authorization_bearer(app.token())
        .await;
    assert_eq!(started.status_code(), StatusCode::OK);
    assert_eq!(started.json::<Value>()["running"], true);

    // already running: no second daemon call
    let again = app
        .server
        .put(&format!("/api/instance/{id}/start"))
        .authorization_bearer(app.token())
        .await;
    assert_eq!(again.status_code(), StatusCode::OK);

    let listed: Vec<Value> = app
        .server
        .get("/api/instance")
        .authorization_bearer(app.token())
        .await
        .json();
    assert_eq!(listed[0]["running"], true);

    let stopped = app
        .server
        .put(&format!("/api/instance/{id}/stop"))
        .authorization_bearer(app.token())
        .await;
    assert_eq!(stopped.status_code(), StatusCode::OK);
    assert_eq!(stopped.json::<Value>()["running"], false);
    assert!(app.state.daemon.running_ids().await.is_empty());
}

#[tokio::test]
async fn test_concurrent_start_calls_daemon_once() {
    let daemon = MockServer::start().await;
    let app = TestApp::with_daemon(&daemon.uri()).await;
    let id = create_instance(&app).await;

    Mock::given(method("POST"))
        .and(path("/instance/start"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(100)))
        .expect(1)
        .mount(&daemon)
        .await;

    let session = SessionId::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    app.state.registry.on_connect(session, tx).await.unwrap();
    app.state.registry.subscribe(session, "/api/instance").await.unwrap();

    let start = format!("/api/instance/{id}/start");
    let (first, second) = tokio::join!(
        app.server.put(&start).authorization_bearer(app.token()).into_future(),
        app.server.put(&start).authorization_bearer(app.token()).into_future()
    );
    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(first.json::<Value>()["running"], true);
    assert_eq!(second.json::<Value>()["running"], true);

    assert_eq!(daemon.received_requests().await.unwrap().len(), 1);
    assert_eq!(rx.try_recv().unwrap(), "UPDATE\n\n/api/instance");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_daemon_failure_is_bad_gateway() {
    let daemon = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/instance/start"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"details": "", "msg": "connect refused"})),
        )
        .mount(&daemon)
        .await;

    let app = TestApp::with_daemon(&daemon.uri()).await;
    let id = create_instance(&app).await;

    let response = app
        .server
        .put(&format!("/api/instance/{id}/start"))
        .authorization_bearer(app.token())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    crate::assert_contains!(body["error"].as_str().unwrap(), "connect refused");
    assert!(!app.state.daemon.is_running(id).await);
}

#[tokio::test]
async fn test_unreachable_daemon_is_bad_gateway() {
    let app = TestApp::new().await;
    let id = create_instance(&app).await;

    let response = app
        .server
        .put(&format!("/api/instance/{id}/start"))
        .authorization_bearer(app.token())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_start_missing_instance() {
    let app = TestApp::new().await;
    let response = app
        .server
        .put("/api/instance/404/start")
        .authorization_bearer(app.token())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
