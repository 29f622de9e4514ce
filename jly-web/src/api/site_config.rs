//! `GET /site-config.json`
//!
//! Serves the document exactly as stored, read fresh on every request and
//! marked `no-store` so browsers never reuse a stale copy.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use jly_common::site::SITE_CONFIG_FILE;
use std::io::ErrorKind;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /site-config.json
pub async fn get_site_config(State(state): State<AppState>) -> ApiResult<Response> {
    let path = state.config.site_config_path();
    let raw = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => ApiError::NotFound(SITE_CONFIG_FILE.to_string()),
        _ => ApiError::Internal(format!("read {}: {}", path.display(), e)),
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        raw,
    )
        .into_response())
}

pub fn site_config_routes() -> Router<AppState> {
    Router::new().route("/site-config.json", get(get_site_config))
}
