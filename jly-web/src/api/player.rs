//! Player session API
//!
//! The page opens a session, subscribes to its event stream, and reports
//! widget callbacks back. Commands for the widget (`command` events) and
//! view updates (`view` events) arrive over SSE.
//!
//! The page must wait for the first `view` event before reporting
//! `library_ready` / `mounted`, so the construction command has a listener.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::Stream;
use jly_player::{PlayerView, RelayEvent, SessionPhase};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::catalog::pool_entry;
use crate::error::{ApiError, ApiResult};
use crate::players::{PlayerHandle, WidgetReport};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Initial item; defaults to the catalog's latest
    pub item_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub inject_library: bool,
    pub view: PlayerView,
}

async fn find_session(state: &AppState, id: Uuid) -> ApiResult<std::sync::Arc<PlayerHandle>> {
    state
        .players
        .get(&id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("player session {}", id)))
}

/// POST /api/player/sessions
pub async fn create_session(
    State(state): State<AppState>,
    request: Option<Json<CreateSessionRequest>>,
) -> ApiResult<(StatusCode, Json<SessionCreated>)> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let initial_item = match request.item_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Some(pool_entry(&state.catalog.pool().await, id)),
        _ => state.catalog.latest().await,
    };

    let opened = state.players.open(initial_item).await;
    let view = opened.handle.view().await;
    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: opened.handle.id,
            inject_library: opened.inject_library,
            view,
        }),
    ))
}

/// GET /api/player/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PlayerView>> {
    let handle = find_session(&state, id).await?;
    Ok(Json(handle.view().await))
}

/// POST /api/player/sessions/:id/widget
pub async fn report_widget_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(report): Json<WidgetReport>,
) -> ApiResult<Json<PlayerView>> {
    let handle = find_session(&state, id).await?;
    debug!(session_id = %id, ?report, "Widget report");
    Ok(Json(handle.report(report).await?))
}

/// POST /api/player/sessions/:id/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PlayerView>> {
    let handle = find_session(&state, id).await?;
    Ok(Json(handle.toggle().await?))
}

/// POST /api/player/sessions/:id/shuffle
pub async fn shuffle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PlayerView>> {
    let handle = find_session(&state, id).await?;
    let pool = state.catalog.pool().await;
    Ok(Json(handle.shuffle(&pool).await?))
}

/// POST /api/player/sessions/:id/teardown
pub async fn teardown(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PlayerView>> {
    state
        .players
        .close(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("player session {}", id)))
}

fn sse_event(event: &RelayEvent) -> Option<Event> {
    match event.to_json() {
        Ok(json) => Some(Event::default().event(event.name()).data(json)),
        Err(e) => {
            warn!("Dropping unserializable relay event: {}", e);
            None
        }
    }
}

/// GET /api/player/sessions/:id/events
///
/// Starts with the current view; ends after the session's closing view.
pub async fn session_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let handle = find_session(&state, id).await?;
    let mut rx = handle.relay().subscribe();
    let initial = RelayEvent::View(handle.view().await);
    drop(handle);
    info!(session_id = %id, "Player event stream connected");

    let stream = async_stream::stream! {
        if let Some(event) = sse_event(&initial) {
            yield Ok(event);
        }
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let closing = matches!(
                        &event,
                        RelayEvent::View(view) if view.phase == SessionPhase::Closed
                    );
                    if let Some(sse) = sse_event(&event) {
                        yield Ok(sse);
                    }
                    if closing {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(session_id = %id, skipped, "Player event stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
        debug!(session_id = %id, "Player event stream ended");
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    ))
}

pub fn player_routes() -> Router<AppState> {
    Router::new()
        .route("/api/player/sessions", post(create_session))
        .route("/api/player/sessions/:id", get(get_session))
        .route("/api/player/sessions/:id/events", get(session_events))
        .route("/api/player/sessions/:id/widget", post(report_widget_event))
        .route("/api/player/sessions/:id/toggle", post(toggle))
        .route("/api/player/sessions/:id/shuffle", post(shuffle))
        .route("/api/player/sessions/:id/teardown", post(teardown))
}
