//! Shared page shell: head metadata, OpenGraph/Twitter cards, JSON-LD
//!
//! Metadata comes from the metadata read path, so a missing or broken site
//! config still yields a complete page head built from the defaults below.

use jly_common::site::read_public_site_config;
use jly_common::SiteConfiguration;
use serde_json::json;

use super::html::{escape, script_json};
use crate::config::ServerConfig;

pub const DEFAULT_TITLE: &str = "九黎月 | Official Website";
pub const DEFAULT_DESCRIPTION: &str = "九黎月官方網站 - 探索東方幻念音樂世界";
pub const ARTIST_NAME: &str = "九黎月";
pub const OG_IMAGE_PATH: &str = "/og.jpg";
pub const SITE_LANG: &str = "zh-TW";

#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub og_image_url: String,
    pub site_url: String,
    /// Absolute URLs of enabled outbound links
    pub same_as: Vec<String>,
}

impl PageMeta {
    pub fn from_config(
        config: Option<&SiteConfiguration>,
        server: &ServerConfig,
        path: &str,
    ) -> Self {
        let non_blank = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        let title = config
            .and_then(|c| non_blank(&c.site.title))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let description = config
            .and_then(|c| non_blank(&c.site.description))
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
        let same_as = config
            .map(|c| {
                c.visible_links()
                    .map(|link| link.url.trim())
                    .filter(|url| url.starts_with("https://") || url.starts_with("http://"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            title,
            description,
            canonical_url: server.absolute_url(path),
            og_image_url: server.absolute_url(OG_IMAGE_PATH),
            site_url: server.site_url.clone(),
            same_as,
        }
    }

    /// Build metadata for `path` from the current document, or the defaults
    pub async fn load(server: &ServerConfig, path: &str) -> Self {
        let config = read_public_site_config(&server.site_config_path()).await;
        Self::from_config(config.as_ref(), server, path)
    }

    /// Prefix the site title with a page name
    pub fn with_page_title(mut self, page: &str) -> Self {
        if !page.trim().is_empty() {
            self.title = format!("{} | {}", page.trim(), self.title);
        }
        self
    }

    pub fn json_ld(&self) -> serde_json::Value {
        json!({
            "@context": "https://schema.org",
            "@type": "MusicGroup",
            "name": ARTIST_NAME,
            "url": self.site_url,
            "description": self.description,
            "image": self.og_image_url,
            "sameAs": self.same_as,
        })
    }
}

/// Wrap page body markup in the full document
pub fn render_document(meta: &PageMeta, body_class: &str, body: &str) -> String {
    let title = escape(&meta.title);
    let description = escape(&meta.description);
    let canonical = escape(&meta.canonical_url);
    let og_image = escape(&meta.og_image_url);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="description" content="{description}">
    <link rel="canonical" href="{canonical}">
    <meta property="og:type" content="website">
    <meta property="og:locale" content="zh_TW">
    <meta property="og:site_name" content="{artist}">
    <meta property="og:title" content="{title}">
    <meta property="og:description" content="{description}">
    <meta property="og:url" content="{canonical}">
    <meta property="og:image" content="{og_image}">
    <meta name="twitter:card" content="summary_large_image">
    <meta name="twitter:title" content="{title}">
    <meta name="twitter:description" content="{description}">
    <meta name="twitter:image" content="{og_image}">
    <link rel="stylesheet" href="/static/site.css">
    <script type="application/ld+json">{json_ld}</script>
</head>
<body class="{body_class}">
{body}
<script src="/static/site.js" defer></script>
</body>
</html>
"#,
        lang = SITE_LANG,
        artist = ARTIST_NAME,
        json_ld = script_json(&meta.json_ld()),
        body_class = escape(body_class),
    )
}

/// Page body for a document that failed to load
pub fn error_banner(message: &str) -> String {
    format!(
        r#"<main class="page-error"><div class="error-banner" role="alert">{}</div></main>"#,
        escape(message)
    )
}
