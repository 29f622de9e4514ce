//! Landing page: profile, link list, feature blocks, player, footer

use axum::extract::State;
use axum::response::Html;
use chrono::Datelike;
use jly_common::site::{load_site_config, FeatureToggle};
use jly_common::{LinkEntry, SiteConfiguration};
use jly_player::CatalogSnapshot;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use super::html::{escape, gradient_css};
use super::icons::icon_svg;
use super::layout::{error_banner, render_document, PageMeta, ARTIST_NAME};
use crate::AppState;

/// Upper bound on cheer affordances alive at once; the oldest goes first
pub const MAX_CHEER_AFFORDANCES: usize = 24;
/// Lifetime of one cheer affordance
pub const CHEER_AFFORDANCE_TTL_MS: u64 = 3000;

pub const CONFIG_LOAD_FAILED: &str = "網站設定載入失敗，請稍後再試。";
const LATEST_LOADING_TITLE: &str = "載入中…";
const DEFAULT_LATEST_LABEL: &str = "最新作品";

/// GET /
pub async fn landing_page(State(state): State<AppState>) -> Html<String> {
    let meta = PageMeta::load(&state.config, "/").await;

    let body = match load_site_config(&state.config.site_config_path()).await {
        Ok(config) => {
            let catalog = state.catalog.snapshot().await;
            let whisper = pick_whisper(&config, &mut rand::thread_rng()).map(str::to_string);
            render_landing(&config, &catalog, whisper.as_deref(), chrono::Local::now().year())
        }
        Err(e) => {
            warn!("Landing page cannot load site config: {}", e);
            error_banner(CONFIG_LOAD_FAILED)
        }
    };

    Html(render_document(&meta, "landing", &body))
}

/// One whisper drawn uniformly, when whispers are on and any exist
pub fn pick_whisper<'a, R: Rng + ?Sized>(
    config: &'a SiteConfiguration,
    rng: &mut R,
) -> Option<&'a str> {
    if !config.features.is_enabled(FeatureToggle::Whispers) {
        return None;
    }
    config.features.whispers.choose(rng).map(String::as_str)
}

pub fn render_landing(
    config: &SiteConfiguration,
    catalog: &CatalogSnapshot,
    whisper: Option<&str>,
    year: i32,
) -> String {
    let features = &config.features;
    let mut body = String::new();

    body.push_str(&render_background(config));
    body.push_str(r#"<main class="landing">"#);
    body.push_str(&render_profile(config));

    if let Some(whisper) = whisper {
        body.push_str(&format!(
            r#"<p class="whisper">{}</p>"#,
            escape(whisper)
        ));
    }

    if features.is_enabled(FeatureToggle::YouTubeLatest) {
        body.push_str(&render_latest_button(config, catalog));
    }

    body.push_str(r#"<nav class="links">"#);
    for link in config.visible_links() {
        body.push_str(&render_link(link));
    }
    body.push_str("</nav>");

    if features.is_enabled(FeatureToggle::CheerButton) {
        body.push_str(&format!(
            r#"<div class="cheer"><button type="button" id="cheer-button" data-max-affordances="{}" data-ttl-ms="{}">{}</button><div id="cheer-layer" aria-hidden="true"></div></div>"#,
            MAX_CHEER_AFFORDANCES,
            CHEER_AFFORDANCE_TTL_MS,
            escape(&features.cheer_label)
        ));
    }

    if features.is_enabled(FeatureToggle::YouTubePlayer) {
        body.push_str(&render_player(config, catalog));
    }

    body.push_str("</main>");
    body.push_str(&render_footer(config, catalog, year));
    body
}

fn render_background(config: &SiteConfiguration) -> String {
    let image = config.theme.background_image.trim();
    if image.is_empty() {
        return String::new();
    }
    format!(
        r#"<div class="backdrop" style="background-image: url('{}')"></div>"#,
        escape(image)
    )
}

fn render_profile(config: &SiteConfiguration) -> String {
    let logo = config.theme.logo_title_image.trim();
    let heading = if logo.is_empty() {
        format!("<h1>{}</h1>", escape(ARTIST_NAME))
    } else {
        format!(
            r#"<h1><img class="title-logo" src="{}" alt="{}"></h1>"#,
            escape(logo),
            escape(ARTIST_NAME)
        )
    };

    let bio: String = config
        .site
        .bio_lines
        .iter()
        .map(|line| format!("<p>{}</p>", escape(line)))
        .collect();

    format!(r#"<header class="profile">{}<div class="bio">{}</div></header>"#, heading, bio)
}

/// Latest item when the catalog knows it, else the channel root with a
/// loading title; the page script fills the title in later.
fn render_latest_button(config: &SiteConfiguration, catalog: &CatalogSnapshot) -> String {
    let label = match config.youtube.latest_button_label.trim() {
        "" => DEFAULT_LATEST_LABEL,
        label => label,
    };

    let (href, title, marker) = match &catalog.latest {
        Some(latest) => (
            latest.watch_url(),
            latest.title.as_str(),
            r#"<span class="new-marker">New Release</span>"#,
        ),
        None => (config.youtube.channel_url(), LATEST_LOADING_TITLE, ""),
    };

    format!(
        r#"<a class="latest" id="latest-release" href="{}" target="_blank" rel="noopener noreferrer" data-channel-url="{}"><span class="latest-label">{}</span><span class="latest-title">{}</span>{}</a>"#,
        escape(&href),
        escape(&config.youtube.channel_url()),
        escape(label),
        escape(title),
        marker
    )
}

pub fn render_link(link: &LinkEntry) -> String {
    let badge_left = link
        .badge_left
        .as_deref()
        .map(|b| format!(r#"<span class="badge-left">{}</span>"#, escape(b)))
        .unwrap_or_default();
    let badge = link
        .badge
        .as_deref()
        .map(|b| format!(r#"<span class="badge">{}</span>"#, escape(b)))
        .unwrap_or_default();
    let external = link.url.starts_with("http://") || link.url.starts_with("https://");
    let target = if external {
        r#" target="_blank" rel="noopener noreferrer""#
    } else {
        ""
    };

    format!(
        r#"<a class="link" data-link-id="{id}" href="{url}"{target} style="--hover-gradient: {gradient}">{icon}<span class="link-label">{label}</span>{badge_left}{badge}</a>"#,
        id = escape(&link.id),
        url = escape(&link.url),
        gradient = gradient_css(&link.gradient),
        icon = icon_svg(link.icon),
        label = escape(&link.label),
    )
}

fn render_player(config: &SiteConfiguration, catalog: &CatalogSnapshot) -> String {
    let (item_id, title) = catalog
        .latest
        .as_ref()
        .map(|latest| (latest.id.as_str(), latest.title.as_str()))
        .unwrap_or(("", LATEST_LOADING_TITLE));

    let shuffle = if config.features.is_enabled(FeatureToggle::YouTubeShuffle) {
        r#"<button type="button" class="player-shuffle" data-action="shuffle" aria-label="Shuffle" disabled>⤮</button>"#
    } else {
        ""
    };

    format!(
        r#"<section class="player" id="player" data-initial-item="{item_id}" data-channel-url="{channel}">
<div class="player-mount" id="yt-player"></div>
<div class="player-bar">
<button type="button" class="player-toggle" data-action="toggle" aria-label="Play" disabled>▶</button>
<div class="player-meta"><span class="player-title">{title}</span><div class="player-progress"><div class="player-progress-fill" style="width: 0%"></div></div></div>
{shuffle}
</div>
<p class="player-error" role="status" hidden></p>
<a class="player-fallback" href="{channel}" target="_blank" rel="noopener noreferrer">YouTube</a>
</section>"#,
        item_id = escape(item_id),
        channel = escape(&config.youtube.channel_url()),
        title = escape(title),
    )
}

fn render_footer(config: &SiteConfiguration, catalog: &CatalogSnapshot, year: i32) -> String {
    let logo = config.theme.footer_logo_image.trim();
    let logo = if logo.is_empty() {
        String::new()
    } else {
        format!(
            r#"<img class="footer-logo" src="{}" alt="{}">"#,
            escape(logo),
            escape(ARTIST_NAME)
        )
    };
    // Rendered even while the count is unknown so the page script can fill it in.
    let subscribers = match catalog.subscriber_count.as_deref() {
        Some(count) => format!(
            r#"<p class="subscribers" id="subscriber-count">{} subscribers</p>"#,
            escape(count)
        ),
        None => r#"<p class="subscribers" id="subscriber-count" hidden></p>"#.to_string(),
    };

    format!(
        r#"<footer class="site-footer">{}{}<p class="copyright">© {} {}. All rights reserved.</p></footer>"#,
        logo,
        subscribers,
        year,
        escape(ARTIST_NAME)
    )
}
