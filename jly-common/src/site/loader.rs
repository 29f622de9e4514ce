//! Site configuration read paths
//!
//! Two independent readers over the same file:
//! - [`load_site_config`] for pages that show the document; failures are
//!   returned so the page can render its error state.
//! - [`read_public_site_config`] for page metadata; failures become `None`
//!   so the request falls back to hardcoded defaults.
//!
//! Both read the file fresh on every call. Nothing is cached.

use std::path::Path;
use tracing::{debug, warn};

use super::schema::{SiteConfiguration, CURRENT_SCHEMA_VERSION};
use crate::{Error, Result};

/// File name of the document inside the public directory
pub const SITE_CONFIG_FILE: &str = "site-config.json";

/// Read and parse the site configuration
pub async fn load_site_config(path: &Path) -> Result<SiteConfiguration> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(format!("{} does not exist", path.display()))
        } else {
            Error::Io(e)
        }
    })?;
    let config = parse_site_config(&raw)?;
    debug!(path = %path.display(), links = config.links.len(), "Site config loaded");
    Ok(config)
}

/// Read the site configuration for metadata generation
///
/// Returns `None` on a missing file or a parse failure.
pub async fn read_public_site_config(path: &Path) -> Option<SiteConfiguration> {
    match load_site_config(path).await {
        Ok(config) => Some(config),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Site config unavailable for metadata");
            None
        }
    }
}

/// Parse a document and log authoring problems that do not block loading
pub fn parse_site_config(raw: &str) -> Result<SiteConfiguration> {
    let config: SiteConfiguration = serde_json::from_str(raw)?;

    for id in config.duplicate_link_ids() {
        warn!(link_id = id, "Duplicate link id in site config");
    }
    if config.is_newer_than_supported() {
        warn!(
            version = config.version,
            supported = CURRENT_SCHEMA_VERSION,
            "Site config version is newer than this build; loading without migration"
        );
    }

    Ok(config)
}

/// Pretty JSON with two-space indentation and a trailing newline
pub fn to_pretty_json(config: &SiteConfiguration) -> Result<String> {
    let mut json = serde_json::to_string_pretty(config)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::schema::{Icon, LinkEntry, Wallpapers};
    use tempfile::TempDir;

    fn sample() -> SiteConfiguration {
        let mut cfg = SiteConfiguration {
            version: 1,
            ..Default::default()
        };
        cfg.site.title = "九黎月".to_string();
        cfg.site.bio_lines = vec!["有些夜晚".to_string()];
        cfg.links = vec![LinkEntry {
            id: "vip".to_string(),
            enabled: true,
            label: "守護計畫".to_string(),
            url: "https://example.com/join".to_string(),
            icon: Icon::Crown,
            gradient: "from-red".to_string(),
            badge: Some("VIP".to_string()),
            badge_left: None,
        }];
        cfg.wallpapers = Wallpapers {
            enabled: true,
            remote_base_url: Some(String::new()),
            files: vec!["a.png".to_string()],
            ..Default::default()
        };
        cfg
    }

    #[tokio::test]
    async fn test_load_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = load_site_config(&dir.path().join(SITE_CONFIG_FILE)).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SITE_CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_site_config(&path).await, Err(Error::Json(_))));
        assert!(read_public_site_config(&path).await.is_none());
    }

    #[tokio::test]
    async fn test_reads_fresh_each_call() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SITE_CONFIG_FILE);
        std::fs::write(&path, r#"{"site":{"title":"one"}}"#).unwrap();
        assert_eq!(load_site_config(&path).await.unwrap().site.title, "one");

        std::fs::write(&path, r#"{"site":{"title":"two"}}"#).unwrap();
        assert_eq!(load_site_config(&path).await.unwrap().site.title, "two");
    }

    #[tokio::test]
    async fn test_serialize_then_reload_is_identity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SITE_CONFIG_FILE);
        let original = sample();

        std::fs::write(&path, to_pretty_json(&original).unwrap()).unwrap();
        let reloaded = load_site_config(&path).await.unwrap();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn test_pretty_json_layout() {
        let json = to_pretty_json(&sample()).unwrap();
        assert!(json.ends_with("}\n"));
        assert!(json.contains("\n  \"version\": 1,"));
    }

    #[test]
    fn test_newer_version_still_parses() {
        let cfg = parse_site_config(r#"{"version": 99}"#).unwrap();
        assert!(cfg.is_newer_than_supported());
    }
}
