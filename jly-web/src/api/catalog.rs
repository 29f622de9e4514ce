//! `GET /api/catalog`: the current catalog snapshot for page scripts

use axum::extract::State;
use axum::{routing::get, Json, Router};
use jly_common::site::read_public_site_config;
use jly_player::{CatalogSnapshot, VideoPoolEntry};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    #[serde(flatten)]
    pub snapshot: CatalogSnapshot,
    /// Where the "latest release" button points right now
    pub latest_url: String,
}

/// GET /api/catalog
pub async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let snapshot = state.catalog.snapshot().await;
    let latest_url = match &snapshot.latest {
        Some(latest) => latest.watch_url(),
        None => read_public_site_config(&state.config.site_config_path())
            .await
            .map(|config| config.youtube.channel_url())
            .unwrap_or_else(|| jly_common::site::YouTubeSettings::default().channel_url()),
    };

    Json(CatalogResponse {
        snapshot,
        latest_url,
    })
}

/// Find `id` in the pool, so a page-supplied id keeps its title
pub fn pool_entry(pool: &[VideoPoolEntry], id: &str) -> VideoPoolEntry {
    pool.iter()
        .find(|entry| entry.id == id)
        .cloned()
        .unwrap_or_else(|| VideoPoolEntry::new(id, ""))
}

pub fn catalog_routes() -> Router<AppState> {
    Router::new().route("/api/catalog", get(get_catalog))
}
