//! Listing topics are notified by every successful mutation
//!
//! A session is registered straight on the app's registry with a plain
//! channel, so the queued frames can be read without a socket.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use yamba_management::backend::realtime::SessionId;

use crate::common::TestApp;

const USER_UPDATE: &str = "UPDATE\n\n/api/user";
const GROUP_UPDATE: &str = "UPDATE\n\n/api/group";

async fn listen(app: &TestApp, topic: &str) -> mpsc::UnboundedReceiver<String> {
    let id = SessionId::new();
    let (tx, rx) = mpsc::unbounded_channel();
    app.state.registry.on_connect(id, tx).await.unwrap();
    app.state.registry.subscribe(id, topic).await.unwrap();
    rx
}

/// Frames queued so far
fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
    }
    frames
}

#[tokio::test]
async fn test_user_mutations_notify_user_listing() {
    let app = TestApp::new().await;
    let mut users = listen(&app, "/api/user").await;
    let mut groups = listen(&app, "/api/group").await;

    let created = app
        .server
        .post("/api/user")
        .authorization_bearer(app.token())
        .json(&json!({"username": "alice", "password": "secret"}))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    assert_eq!(drain(&mut users), vec![USER_UPDATE]);
    let id = created.json::<Value>()["id"].as_i64().unwrap();

    let duplicate = app
        .server
        .post("/api/user")
        .authorization_bearer(app.token())
        .json(&json!({"username": "alice", "password": "secret"}))
        .await;
    assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);
    assert!(drain(&mut users).is_empty());

    let updated = app
        .server
        .put(&format!("/api/user/{id}"))
        .authorization_bearer(app.token())
        .json(&json!({"enabled": false}))
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    assert_eq!(drain(&mut users), vec![USER_UPDATE]);

    let grant = app
        .server
        .put(&format!("/api/user/{id}/authority/0"))
        .authorization_bearer(app.token())
        .await;
    assert_eq!(grant.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(drain(&mut users), vec![USER_UPDATE]);

    let revoke = app
        .server
        .delete(&format!("/api/user/{id}/authority/0"))
        .authorization_bearer(app.token())
        .await;
    assert_eq!(revoke.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(drain(&mut users), vec![USER_UPDATE]);

    let deleted = app
        .server
        .delete(&format!("/api/user/{id}"))
        .authorization_bearer(app.token())
        .await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(drain(&mut users), vec![USER_UPDATE]);

    let missing = app
        .server
        .delete(&format!("/api/user/{id}"))
        .authorization_bearer(app.token())
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    assert!(drain(&mut users).is_empty());

    assert!(drain(&mut groups).is_empty());
}

#[tokio::test]
async fn test_group_mutations_notify_group_listing() {
    let app = TestApp::new().await;
    let mut groups = listen(&app, "/api/group").await;
    let mut users = listen(&app, "/api/user").await;

    let created = app
        .server
        .post("/api/group")
        .authorization_bearer(app.token())
        .json(&json!({"name": "admins"}))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    assert_eq!(drain(&mut groups), vec![GROUP_UPDATE]);
    let id = created.json::<Value>()["id"].as_i64().unwrap();

    let renamed = app
        .server
        .put(&format!("/api/group/{id}"))
        .authorization_bearer(app.token())
        .json(&json!({"name": "operators"}))
        .await;
    assert_eq!(renamed.status_code(), StatusCode::OK);
    assert_eq!(drain(&mut groups), vec![GROUP_UPDATE]);

    let member_path = format!("/api/group/{id}/member/{}", app.user.id);
    let added = app.server.put(&member_path).authorization_bearer(app.token()).await;
    assert_eq!(added.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(drain(&mut groups), vec![GROUP_UPDATE]);

    // already a member, nothing changed
    let again = app.server.put(&member_path).authorization_bearer(app.token()).await;
    assert_eq!(again.status_code(), StatusCode::NO_CONTENT);
    assert!(drain(&mut groups).is_empty());

    let removed = app.server.delete(&member_path).authorization_bearer(app.token()).await;
    assert_eq!(removed.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(drain(&mut groups), vec![GROUP_UPDATE]);

    let not_member = app.server.delete(&member_path).authorization_bearer(app.token()).await;
    assert_eq!(not_member.status_code(), StatusCode::NOT_FOUND);
    assert!(drain(&mut groups).is_empty());

    let grant = app
        .server
        .put(&format!("/api/group/{id}/authority/0"))
        .authorization_bearer(app.token())
        .await;
    assert_eq!(grant.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(drain(&mut groups), vec![GROUP_UPDATE]);

    let revoke = app
        .server
        .delete(&format!("/api/group/{id}/authority/0"))
        .authorization_bearer(app.token())
        .await;
    assert_eq!(revoke.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(drain(&mut groups), vec![GROUP_UPDATE]);

    let deleted = app
        .server
        .delete(&format!("/api/group/{id}"))
        .authorization_bearer(app.token())
        .await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(drain(&mut groups), vec![GROUP_UPDATE]);

    assert!(drain(&mut users).is_empty());
}

#[tokio::test]
async fn test_reads_do_not_notify() {
    let app = TestApp::new().await;
    let mut users = listen(&app, "/api/user").await;
    let mut groups = listen(&app, "/api/group").await;

    for path in ["/api/user", "/api/group", "/api/authority", "/api/auth/me"] {
        let response = app.server.get(path).authorization_bearer(app.token()).await;
        assert_eq!(response.status_code(), StatusCode::OK, "{path}");
    }

    assert!(drain(&mut users).is_empty());
    assert!(drain(&mut groups).is_empty());
}
