//! Crawler artifacts: `robots.txt` and `sitemap.xml`

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use chrono::NaiveDate;

use crate::config::ServerConfig;
use crate::AppState;

/// One sitemap entry
struct SitemapEntry {
    path: &'static str,
    change_frequency: &'static str,
    priority: f32,
}

const SITEMAP: [SitemapEntry; 2] = [
    SitemapEntry {
        path: "/",
        change_frequency: "weekly",
        priority: 1.0,
    },
    SitemapEntry {
        path: "/photos",
        change_frequency: "monthly",
        priority: 0.7,
    },
];

pub fn render_robots(config: &ServerConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /api\n\nSitemap: {}\n",
        config.absolute_url("/sitemap.xml")
    )
}

pub fn render_sitemap(config: &ServerConfig, last_modified: NaiveDate) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in &SITEMAP {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            config.absolute_url(entry.path),
            last_modified.format("%Y-%m-%d"),
            entry.change_frequency,
            entry.priority
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// GET /robots.txt
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(&state.config),
    )
}

/// GET /sitemap.xml
pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_sitemap(&state.config, chrono::Utc::now().date_naive()),
    )
}

pub fn seo_routes() -> Router<AppState> {
    Router::new()
        .route("/robots.txt", get(robots))
        .route("/sitemap.xml", get(sitemap))
}
