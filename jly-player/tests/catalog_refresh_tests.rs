//! Catalog refresh against a local stand-in for the video data API
//!
//! Covers call order, the uploads fallback, per-call failure isolation, and
//! the no-credential path sending nothing.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use jly_player::catalog::{CallOutcome, CatalogRefresher, CatalogState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const CHANNEL: &str = "UCZVT570EWJ64ibL-re9CFpQ";

/// Scripted responses plus a log of every request received
#[derive(Clone, Default)]
struct MockApi {
    calls: Arc<Mutex<Vec<String>>>,
    search: Option<Value>,
    channels: Option<Value>,
    uploads: Option<Value>,
}

impl MockApi {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, endpoint: &str, params: &HashMap<String, String>) {
        assert_eq!(params.get("key").map(String::as_str), Some("test-key"));
        self.calls.lock().unwrap().push(endpoint.to_string());
    }
}

fn reply(body: &Option<Value>) -> Response {
    match body {
        Some(body) => Json(body.clone()).into_response(),
        None => (StatusCode::FORBIDDEN, "quotaExceeded").into_response(),
    }
}

async fn search(State(api): State<MockApi>, Query(params): Query<HashMap<String, String>>) -> Response {
    api.record("search", &params);
    assert_eq!(params.get("channelId").map(String::as_str), Some(CHANNEL));
    assert_eq!(params.get("order").map(String::as_str), Some("date"));
    reply(&api.search)
}

async fn channels(State(api): State<MockApi>, Query(params): Query<HashMap<String, String>>) -> Response {
    api.record("channels", &params);
    assert_eq!(params.get("part").map(String::as_str), Some("statistics"));
    reply(&api.channels)
}

async fn playlist_items(
    State(api): State<MockApi>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    api.record("playlistItems", &params);
    assert_eq!(
        params.get("playlistId").map(String::as_str),
        Some("UUZVT570EWJ64ibL-re9CFpQ")
    );
    reply(&api.uploads)
}

/// Serve `api` on an ephemeral port; returns the base URL
async fn start_mock(api: MockApi) -> String {
    let app = Router::new()
        .route("/search", get(search))
        .route("/channels", get(channels))
        .route("/playlistItems", get(playlist_items))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn search_body(items: &[(&str, &str)]) -> Value {
    let items: Vec<Value> = items
        .iter()
        .map(|(id, title)| json!({"id": {"kind": "youtube#video", "videoId": id}, "snippet": {"title": title}}))
        .collect();
    json!({ "items": items })
}

fn uploads_body(items: &[(&str, &str)]) -> Value {
    let items: Vec<Value> = items
        .iter()
        .map(|(id, title)| json!({"snippet": {"title": title, "resourceId": {"videoId": id}}}))
        .collect();
    json!({ "items": items })
}

#[tokio::test]
async fn test_search_fills_latest_and_pool() {
    let api = MockApi {
        search: Some(search_body(&[
            ("v3", "夜行 (Official MV)"),
            ("v2", "月光"),
            ("v3", "duplicate"),
        ])),
        channels: Some(json!({"items": [{"statistics": {"subscriberCount": "12345"}}]})),
        ..Default::default()
    };
    let base = start_mock(api.clone()).await;

    let state = CatalogState::new();
    let report = CatalogRefresher::new(Some("test-key"), &base)
        .refresh(CHANNEL, &state)
        .await;

    assert_eq!(report.search, CallOutcome::Updated);
    assert_eq!(report.statistics, CallOutcome::Updated);
    assert_eq!(report.uploads, CallOutcome::Skipped);
    assert_eq!(api.calls(), vec!["search", "channels"]);

    let snapshot = state.snapshot().await;
    let latest = snapshot.latest.unwrap();
    assert_eq!(latest.id, "v3");
    assert_eq!(latest.title, "夜行");
    assert_eq!(snapshot.subscriber_count.as_deref(), Some("12.3K"));
    let ids: Vec<&str> = snapshot.pool.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["v3", "v2"]);
}

#[tokio::test]
async fn test_empty_search_falls_back_to_uploads() {
    let api = MockApi {
        search: Some(json!({"items": []})),
        channels: Some(json!({"items": [{"statistics": {"subscriberCount": "850"}}]})),
        uploads: Some(uploads_body(&[("u1", "First (Live)"), ("u2", "Second")])),
        ..Default::default()
    };
    let base = start_mock(api.clone()).await;

    let state = CatalogState::new();
    let report = CatalogRefresher::new(Some("test-key"), &base)
        .refresh(CHANNEL, &state)
        .await;

    assert_eq!(report.search, CallOutcome::Empty);
    assert_eq!(report.uploads, CallOutcome::Updated);
    assert_eq!(api.calls(), vec!["search", "channels", "playlistItems"]);

    let snapshot = state.snapshot().await;
    assert_eq!(snapshot.latest.unwrap().title, "First");
    assert_eq!(snapshot.subscriber_count.as_deref(), Some("850"));
    assert_eq!(snapshot.pool.len(), 2);
}

#[tokio::test]
async fn test_failed_calls_are_isolated() {
    // Search rejected (quota), statistics fine, uploads rejected too.
    let api = MockApi {
        channels: Some(json!({"items": [{"statistics": {"subscriberCount": "2000"}}]})),
        ..Default::default()
    };
    let base = start_mock(api.clone()).await;

    let state = CatalogState::new();
    let report = CatalogRefresher::new(Some("test-key"), &base)
        .refresh(CHANNEL, &state)
        .await;

    assert_eq!(report.search, CallOutcome::Failed);
    assert_eq!(report.statistics, CallOutcome::Updated);
    assert_eq!(report.uploads, CallOutcome::Failed);

    let snapshot = state.snapshot().await;
    assert!(snapshot.latest.is_none());
    assert!(snapshot.pool.is_empty());
    assert_eq!(snapshot.subscriber_count.as_deref(), Some("2.0K"));
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_slices() {
    let good = MockApi {
        search: Some(search_body(&[("v1", "One")])),
        channels: Some(json!({"items": [{"statistics": {"subscriberCount": "10"}}]})),
        ..Default::default()
    };
    let good_base = start_mock(good).await;
    let state = CatalogState::new();
    CatalogRefresher::new(Some("test-key"), &good_base)
        .refresh(CHANNEL, &state)
        .await;

    let broken_base = start_mock(MockApi::default()).await;
    CatalogRefresher::new(Some("test-key"), &broken_base)
        .refresh(CHANNEL, &state)
        .await;

    let snapshot = state.snapshot().await;
    assert_eq!(snapshot.latest.unwrap().id, "v1");
    assert_eq!(snapshot.subscriber_count.as_deref(), Some("10"));
}

#[tokio::test]
async fn test_placeholder_credential_makes_no_calls() {
    let api = MockApi {
        search: Some(search_body(&[("v1", "One")])),
        ..Default::default()
    };
    let base = start_mock(api.clone()).await;

    for key in ["你的 YouTube API Key", "YOUR_API_KEY", "   "] {
        let state = CatalogState::new();
        let refresher = CatalogRefresher::new(Some(key), &base);
        assert!(!refresher.is_enabled());
        refresher.refresh(CHANNEL, &state).await;
        assert!(state.latest().await.is_none());
    }
    CatalogRefresher::new(None, &base).refresh(CHANNEL, &CatalogState::new()).await;

    assert!(api.calls().is_empty());
}
