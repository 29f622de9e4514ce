//! jly-web library - artist site HTTP server
//!
//! Server-rendered landing, gallery and admin pages over the site config
//! document, plus the JSON/SSE endpoints the page scripts talk to.

use axum::Router;
use jly_common::site::ConfigEditor;
use jly_player::CatalogState;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod pages;
pub mod players;
pub mod refresh;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use players::PlayerRegistry;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Latest catalog snapshot, filled by the background refresh
    pub catalog: CatalogState,
    pub players: PlayerRegistry,
    /// Admin working copy; `None` until the admin page first loads it
    pub editor: Arc<Mutex<Option<ConfigEditor>>>,
}

impl AppState {
    pub fn new(config: ServerConfig, catalog: CatalogState) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            players: PlayerRegistry::new(),
            editor: Arc::new(Mutex::new(None)),
        }
    }
}

/// Build application router
///
/// Anything not matched by a route is served from the public directory.
pub fn build_router(state: AppState) -> Router {
    let public = ServeDir::new(&state.config.public_dir);

    Router::new()
        // HTML pages
        .merge(pages::page_routes())
        .merge(pages::admin_routes(state.clone()))
        // API routes
        .merge(api::health_routes())
        .merge(api::site_config_routes())
        .merge(api::seo_routes())
        .merge(api::catalog_routes())
        .merge(api::player_routes())
        .fallback_service(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
