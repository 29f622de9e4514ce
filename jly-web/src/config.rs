//! Server configuration resolution
//!
//! Every setting resolves CLI/ENV (already merged by clap) > TOML > default.

use jly_common::config::{Environment, TomlConfig};
use jly_common::site::SITE_CONFIG_FILE;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_PUBLIC_DIR: &str = "./public";
pub const DEFAULT_SITE_URL: &str = "https://www.jiuliyue.com";
pub const DEFAULT_CATALOG_REFRESH_SECS: u64 = 15 * 60;
pub const DEFAULT_LOG_FILTER: &str = "jly_web=info,jly_player=info,tower_http=info";

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_addr: Option<IpAddr>,
    pub port: Option<u16>,
    pub public_dir: Option<PathBuf>,
    pub site_url: Option<String>,
    pub environment: Option<Environment>,
    pub youtube_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Static asset root; also holds `site-config.json`
    pub public_dir: PathBuf,
    /// Canonical origin used in sitemap, robots and OpenGraph URLs
    pub site_url: String,
    pub environment: Environment,
    pub youtube_api_key: Option<String>,
    pub catalog_refresh: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            site_url: DEFAULT_SITE_URL.to_string(),
            environment: Environment::default(),
            youtube_api_key: None,
            catalog_refresh: Duration::from_secs(DEFAULT_CATALOG_REFRESH_SECS),
        }
    }
}

impl ServerConfig {
    /// Merge CLI/ENV overrides over the TOML file over defaults
    pub fn resolve(cli: CliOverrides, toml: &TomlConfig) -> Self {
        let defaults = Self::default();

        let bind_addr = cli.bind_addr.unwrap_or_else(|| {
            match toml.bind_addr.as_deref().map(str::parse::<IpAddr>) {
                Some(Ok(addr)) => addr,
                Some(Err(e)) => {
                    warn!("Ignoring invalid bind_addr in TOML: {}", e);
                    defaults.bind_addr
                }
                None => defaults.bind_addr,
            }
        });

        let youtube_api_key = cli
            .youtube_api_key
            .or_else(|| toml.youtube_api_key.clone())
            .filter(|key| !key.trim().is_empty());

        let catalog_refresh = toml
            .catalog_refresh_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.catalog_refresh);

        let config = Self {
            bind_addr,
            port: cli.port.or(toml.port).unwrap_or(defaults.port),
            public_dir: cli
                .public_dir
                .or_else(|| toml.public_dir.clone())
                .unwrap_or(defaults.public_dir),
            site_url: cli
                .site_url
                .or_else(|| toml.site_url.clone())
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.site_url),
            environment: cli
                .environment
                .or(toml.environment)
                .unwrap_or(defaults.environment),
            youtube_api_key,
            catalog_refresh,
        };

        info!(
            environment = %config.environment,
            public_dir = %config.public_dir.display(),
            "Server configuration resolved"
        );
        config
    }

    pub fn site_config_path(&self) -> PathBuf {
        self.public_dir.join(SITE_CONFIG_FILE)
    }

    /// Absolute URL for a site-relative path
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.site_url, path)
        } else {
            format!("{}/{}", self.site_url, path)
        }
    }
}

/// Filter directive: RUST_LOG wins, then the TOML level, then the default
pub fn log_filter(toml: &TomlConfig) -> String {
    match std::env::var("RUST_LOG") {
        Ok(filter) if !filter.trim().is_empty() => filter,
        _ if toml.logging.level != "info" => toml.logging.level.clone(),
        _ => DEFAULT_LOG_FILTER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_overrides() {
        let config = ServerConfig::resolve(CliOverrides::default(), &TomlConfig::default());
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.site_url, DEFAULT_SITE_URL);
        assert_eq!(config.site_config_path(), PathBuf::from("./public/site-config.json"));
        assert_eq!(config.catalog_refresh, Duration::from_secs(900));
    }

    #[test]
    fn test_cli_beats_toml_beats_default() {
        let toml = TomlConfig {
            port: Some(6000),
            site_url: Some("https://toml.example/".to_string()),
            environment: Some(Environment::Development),
            bind_addr: Some("127.0.0.1".to_string()),
            catalog_refresh_secs: Some(60),
            ..Default::default()
        };
        let cli = CliOverrides {
            port: Some(7000),
            ..Default::default()
        };

        let config = ServerConfig::resolve(cli, &toml);
        assert_eq!(config.port, 7000);
        assert_eq!(config.site_url, "https://toml.example");
        assert!(config.environment.is_development());
        assert_eq!(config.bind_addr, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.catalog_refresh, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_toml_bind_addr_falls_back() {
        let toml = TomlConfig {
            bind_addr: Some("not an address".to_string()),
            ..Default::default()
        };
        let config = ServerConfig::resolve(CliOverrides::default(), &toml);
        assert_eq!(config.bind_addr, IpAddr::from([0, 0, 0, 0]));
    }

    #[test]
    fn test_blank_api_key_is_dropped() {
        let cli = CliOverrides {
            youtube_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(ServerConfig::resolve(cli, &TomlConfig::default())
            .youtube_api_key
            .is_none());
    }

    #[test]
    fn test_absolute_url() {
        let config = ServerConfig::default();
        assert_eq!(config.absolute_url("/og.jpg"), "https://www.jiuliyue.com/og.jpg");
        assert_eq!(config.absolute_url("photos"), "https://www.jiuliyue.com/photos");
        assert_eq!(config.absolute_url("https://cdn.example/a"), "https://cdn.example/a");
    }
}
