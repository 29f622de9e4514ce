//! Integration tests for the player session API
//!
//! Drives a session the way the page script does: open it, hold the event
//! stream, report widget callbacks, then use the controls.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use jly_player::CatalogState;
use jly_web::{build_router, AppState, ServerConfig};
use serde_json::{json, Value};
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot` method

fn setup_app() -> (Router, AppState) {
    let state = AppState::new(ServerConfig::default(), CatalogState::new());
    (build_router(state.clone()), state)
}

fn json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request(method, uri, body))
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };
    (status, value)
}

async fn create_session(app: &Router, item_id: Option<&str>) -> Value {
    let body = item_id.map(|id| json!({ "item_id": id }));
    let (status, created) = send(app, "POST", "/api/player/sessions", body).await;
    assert_eq!(status, StatusCode::CREATED);
    created
}

async fn report(app: &Router, session: &str, event: Value) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/api/player/sessions/{}/widget", session),
        Some(event),
    )
    .await
}

/// Event stream reader; holding it keeps the page "connected"
struct EventStream {
    body: Body,
    buffered: String,
}

impl EventStream {
    async fn open(app: &Router, session: &str) -> Self {
        let response = app
            .clone()
            .oneshot(json_request(
                "GET",
                &format!("/api/player/sessions/{}/events", session),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));
        Self {
            body: response.into_body(),
            buffered: String::new(),
        }
    }

    /// Next complete SSE event as (name, data)
    async fn next_event(&mut self) -> (String, Value) {
        loop {
            if let Some(end) = self.buffered.find("\n\n") {
                let raw: String = self.buffered.drain(..end + 2).collect();
                let mut name = String::new();
                let mut data = String::new();
                for line in raw.lines() {
                    if let Some(value) = line.strip_prefix("event: ") {
                        name = value.to_string();
                    } else if let Some(value) = line.strip_prefix("data: ") {
                        data.push_str(value);
                    }
                }
                if name.is_empty() {
                    // keep-alive comment
                    continue;
                }
                return (name, serde_json::from_str(&data).expect("Event data should be JSON"));
            }

            let frame = tokio::time::timeout(Duration::from_secs(5), self.body.frame())
                .await
                .expect("Timed out waiting for event")
                .expect("Stream ended")
                .expect("Stream error");
            if let Ok(data) = frame.into_data() {
                self.buffered.push_str(std::str::from_utf8(&data).unwrap());
            }
        }
    }

    /// Skip ahead to the next `command` event
    async fn next_command(&mut self) -> Value {
        loop {
            let (name, data) = self.next_event().await;
            if name == "command" {
                return data;
            }
        }
    }
}

#[tokio::test]
async fn test_create_and_get_session() {
    let (app, state) = setup_app();

    let created = create_session(&app, Some("abc123")).await;
    let id = created["session_id"].as_str().unwrap().to_string();
    assert!(created["inject_library"].is_boolean());
    assert_eq!(created["view"]["phase"], "uninitialized");
    assert_eq!(created["view"]["current_item"]["id"], "abc123");
    assert_eq!(created["view"]["is_ready"], false);
    assert_eq!(state.players.len().await, 1);

    let (status, view) = send(&app, "GET", &format!("/api/player/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "uninitialized");
}

#[tokio::test]
async fn test_create_without_item_or_catalog() {
    let (app, _) = setup_app();

    let created = create_session(&app, None).await;
    assert!(created["view"]["current_item"].is_null());
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let (app, _) = setup_app();
    let unknown = uuid::Uuid::new_v4();

    let (status, body) = send(&app, "GET", &format!("/api/player/sessions/{}", unknown), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/player/sessions/{}/toggle", unknown),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_widget_lifecycle_over_relay() {
    let (app, _) = setup_app();
    let created = create_session(&app, Some("abc123")).await;
    let id = created["session_id"].as_str().unwrap().to_string();

    let mut events = EventStream::open(&app, &id).await;
    let (name, initial) = events.next_event().await;
    assert_eq!(name, "view");
    assert_eq!(initial["phase"], "uninitialized");

    let (status, view) = report(&app, &id, json!({ "event": "library_ready" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "library_ready");

    let (status, view) = report(&app, &id, json!({ "event": "mounted", "mount": "yt-player" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "player_created");

    let create = events.next_command().await;
    assert_eq!(create, json!({ "command": "create", "mount": "yt-player", "item_id": "abc123" }));

    // Controls stay locked until the widget says it is ready
    let (status, body) = send(&app, "POST", &format!("/api/player/sessions/{}/toggle", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "PLAYER_NOT_READY");

    let (_, view) = report(&app, &id, json!({ "event": "ready" })).await;
    assert_eq!(view["phase"], "interactive");
    assert_eq!(view["is_ready"], true);

    let (status, _) = send(&app, "POST", &format!("/api/player/sessions/{}/toggle", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.next_command().await, json!({ "command": "play" }));

    let (_, view) = report(&app, &id, json!({ "event": "state_change", "state": 1 })).await;
    assert_eq!(view["is_playing"], true);

    send(&app, "POST", &format!("/api/player/sessions/{}/toggle", id), None).await;
    assert_eq!(events.next_command().await, json!({ "command": "pause" }));

    let (status, view) = send(&app, "POST", &format!("/api/player/sessions/{}/teardown", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "closed");
    assert_eq!(events.next_command().await, json!({ "command": "destroy" }));

    let (status, _) = send(&app, "GET", &format!("/api/player/sessions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_widget_error_shows_message_and_playing_recovers() {
    let (app, _) = setup_app();
    let created = create_session(&app, Some("abc123")).await;
    let id = created["session_id"].as_str().unwrap().to_string();
    let _events = EventStream::open(&app, &id).await;

    report(&app, &id, json!({ "event": "library_ready" })).await;
    report(&app, &id, json!({ "event": "mounted", "mount": "yt-player" })).await;
    report(&app, &id, json!({ "event": "ready" })).await;

    let (_, view) = report(&app, &id, json!({ "event": "error", "code": 150 })).await;
    assert_eq!(view["phase"], "errored");
    assert_eq!(view["is_playing"], false);
    assert!(view["last_error"].is_string());

    let (_, view) = report(&app, &id, json!({ "event": "state_change", "state": 1 })).await;
    assert_eq!(view["phase"], "interactive");
    assert!(view["last_error"].is_null());
}

#[tokio::test]
async fn test_creation_without_connected_page_errors() {
    let (app, _) = setup_app();
    let created = create_session(&app, Some("abc123")).await;
    let id = created["session_id"].as_str().unwrap().to_string();

    report(&app, &id, json!({ "event": "library_ready" })).await;
    let (status, body) = report(&app, &id, json!({ "event": "mounted", "mount": "yt-player" })).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "WIDGET_ERROR");

    let (_, view) = send(&app, "GET", &format!("/api/player/sessions/{}", id), None).await;
    assert_eq!(view["phase"], "errored");
    assert!(view["last_error"].is_string());
}

#[tokio::test]
async fn test_shuffle_with_empty_pool_keeps_item() {
    let (app, _) = setup_app();
    let created = create_session(&app, Some("abc123")).await;
    let id = created["session_id"].as_str().unwrap().to_string();
    let _events = EventStream::open(&app, &id).await;

    report(&app, &id, json!({ "event": "library_ready" })).await;
    report(&app, &id, json!({ "event": "mounted", "mount": "yt-player" })).await;
    report(&app, &id, json!({ "event": "ready" })).await;

    let (status, view) = send(&app, "POST", &format!("/api/player/sessions/{}/shuffle", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["current_item"]["id"], "abc123");
}

#[tokio::test]
async fn test_malformed_widget_report_rejected() {
    let (app, _) = setup_app();
    let created = create_session(&app, Some("abc123")).await;
    let id = created["session_id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/player/sessions/{}/widget", id),
            Some(json!({ "event": "explode" })),
        ))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
