//! HTML pages for the public site and the development-only admin editor
//!
//! - **Landing** (`landing`): profile, links, feature blocks, player
//! - **Gallery** (`gallery`): wallpaper grid and lightbox
//! - **Admin** (`admin`): config editor with JSON download
//! - **Layout** (`layout`): shared head metadata and structured data

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};

use crate::AppState;

pub mod admin;
pub mod gallery;
pub mod html;
pub mod icons;
pub mod landing;
pub mod layout;

pub use admin::admin_routes;

// Embed static files at compile time
const SITE_CSS: &str = include_str!("../../static/site.css");
const SITE_JS: &str = include_str!("../../static/site.js");

/// Build public page routes
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(landing::landing_page))
        .route("/photos", get(gallery::gallery_page))
        .route("/static/site.css", get(serve_site_css))
        .route("/static/site.js", get(serve_site_js))
}

/// GET /static/site.css
pub async fn serve_site_css() -> Response {
    (StatusCode::OK, [("content-type", "text/css; charset=utf-8")], SITE_CSS).into_response()
}

/// GET /static/site.js
pub async fn serve_site_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript; charset=utf-8")],
        SITE_JS,
    )
        .into_response()
}
