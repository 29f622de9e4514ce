//! Wallpaper gallery (`/photos`) with a server-rendered lightbox
//!
//! `?view=pK` opens the lightbox on photo `pK`. Unknown ids render the plain
//! grid.

use axum::extract::{Query, State};
use axum::response::Html;
use jly_common::site::gallery::photos;
use jly_common::site::{load_site_config, Photo};
use jly_common::SiteConfiguration;
use serde::Deserialize;
use tracing::warn;

use super::html::escape;
use super::landing::CONFIG_LOAD_FAILED;
use super::layout::{error_banner, render_document, PageMeta};
use crate::AppState;

pub const GALLERY_DISABLED: &str = "桌布下載目前暫停開放。";
const DEFAULT_GALLERY_TITLE: &str = "桌布下載";

#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub view: Option<String>,
}

/// GET /photos
pub async fn gallery_page(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Html<String> {
    let meta = PageMeta::load(&state.config, "/photos").await;

    match load_site_config(&state.config.site_config_path()).await {
        Ok(config) => {
            let meta = meta.with_page_title(gallery_title(&config));
            let body = render_gallery(&config, query.view.as_deref());
            Html(render_document(&meta, "gallery", &body))
        }
        Err(e) => {
            warn!("Gallery cannot load site config: {}", e);
            Html(render_document(&meta, "gallery", &error_banner(CONFIG_LOAD_FAILED)))
        }
    }
}

fn gallery_title(config: &SiteConfiguration) -> &str {
    match config.wallpapers.title.trim() {
        "" => DEFAULT_GALLERY_TITLE,
        title => title,
    }
}

pub fn render_gallery(config: &SiteConfiguration, view: Option<&str>) -> String {
    let wallpapers = &config.wallpapers;
    let mut body = format!(
        r#"<main class="gallery"><header><a class="back" href="/">←</a><h1>{}</h1></header>"#,
        escape(gallery_title(config))
    );

    if !wallpapers.enabled {
        body.push_str(&format!(
            r#"<p class="gallery-disabled">{}</p></main>"#,
            GALLERY_DISABLED
        ));
        return body;
    }

    if !wallpapers.note.trim().is_empty() {
        body.push_str(&format!(r#"<p class="gallery-note">{}</p>"#, escape(&wallpapers.note)));
    }

    let photos = photos(wallpapers);
    body.push_str(r#"<div class="gallery-grid">"#);
    for photo in &photos {
        body.push_str(&format!(
            r#"<a class="gallery-cell" id="{id}" href="/photos?view={id}"><img src="{url}" alt="{alt}" loading="lazy"></a>"#,
            id = escape(&photo.id),
            url = escape(&photo.url),
            alt = escape(&photo.filename),
        ));
    }
    body.push_str("</div>");

    if let Some(photo) = view.and_then(|id| photos.iter().find(|p| p.id == id)) {
        body.push_str(&render_lightbox(photo));
    }

    body.push_str("</main>");
    body
}

fn render_lightbox(photo: &Photo) -> String {
    format!(
        r#"<div class="lightbox" role="dialog" aria-modal="true" aria-label="{alt}">
<a class="lightbox-close" href="/photos#{id}" aria-label="Close">×</a>
<img class="lightbox-image" src="{url}" alt="{alt}">
<a class="lightbox-download" href="{url}" download="{alt}">下載</a>
</div>"#,
        id = escape(&photo.id),
        url = escape(&photo.url),
        alt = escape(&photo.filename),
    )
}
