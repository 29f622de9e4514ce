//! Server settings file loading
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 are handled by the binary's argument parser; this module
//! owns the TOML tier and the shared value types.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Substrings that mark a credential as an unfilled template value
pub const PLACEHOLDER_MARKERS: [&str; 2] = ["你的", "YOUR_"];

/// Deployment environment
///
/// The admin editor is only served in `Development`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(Error::Config(format!("unknown environment: {}", other))),
        }
    }
}

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// EnvFilter directive string, e.g. `info` or `jly_web=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Contents of `jly-web.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bind_addr: Option<String>,
    pub port: Option<u16>,
    pub public_dir: Option<PathBuf>,
    pub site_url: Option<String>,
    pub environment: Option<Environment>,
    pub youtube_api_key: Option<String>,
    pub catalog_refresh_secs: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Platform config path: `~/.config/jly/jly-web.toml` on Linux
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jly").join("jly-web.toml"))
}

/// Parse a TOML settings file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Settings read at startup, with the file they came from
#[derive(Debug, Clone, Default)]
pub struct LoadedSettings {
    pub config: TomlConfig,
    /// `None` when compiled defaults are in use
    pub source: Option<PathBuf>,
}

/// Load the settings file for this process
///
/// An explicitly named file must exist. Without one, the platform default
/// path is used when present, and compiled defaults otherwise. Runs before
/// logging is configured, so callers report `source` themselves.
pub fn load_settings_file(explicit: Option<&Path>) -> Result<LoadedSettings> {
    if let Some(path) = explicit {
        return Ok(LoadedSettings {
            config: load_toml_config(path)?,
            source: Some(path.to_path_buf()),
        });
    }

    match default_config_path() {
        Some(path) if path.exists() => Ok(LoadedSettings {
            config: load_toml_config(&path)?,
            source: Some(path),
        }),
        _ => Ok(LoadedSettings::default()),
    }
}

/// A credential is usable when it is non-blank and not a template value
pub fn is_usable_api_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !PLACEHOLDER_MARKERS.iter().any(|marker| key.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_environment_parse() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(" PROD ".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
        assert_eq!(Environment::default(), Environment::Production);
    }

    #[test]
    fn test_placeholder_keys_rejected() {
        assert!(!is_usable_api_key(""));
        assert!(!is_usable_api_key("   "));
        assert!(!is_usable_api_key("你的API金鑰"));
        assert!(!is_usable_api_key("YOUR_API_KEY"));
        assert!(is_usable_api_key("AIzaSyExample"));
    }

    #[test]
    fn test_load_toml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jly-web.toml");
        std::fs::write(
            &path,
            r#"
port = 8080
environment = "development"
site_url = "https://example.com"

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let config = load_toml_config(&path).unwrap();
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.environment, Some(Environment::Development));
        assert_eq!(config.site_url.as_deref(), Some("https://example.com"));
        assert_eq!(config.logging.level, "debug");
        assert!(config.public_dir.is_none());
    }

    #[test]
    fn test_logging_defaults_when_section_missing() {
        let config: TomlConfig = toml::from_str("port = 1").unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_explicit_file_is_reported_as_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jly-web.toml");
        std::fs::write(&path, "port = 9000\n").unwrap();

        let loaded = load_settings_file(Some(&path)).unwrap();
        assert_eq!(loaded.config.port, Some(9000));
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = load_settings_file(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
