//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [backend]
//! url = "http://localhost:4000"
//! timeout_secs = 30
//!
//! [storage]
//! data_dir = "~/.local/share/bountyboard"
//! session_key = "bountyboard-auth"
//! bookmarks_key = "bountyboard-bookmarks"
//! winners_prefix = "bountyboard-winners-"
//!
//! [auth]
//! coalesce_refresh = true
//! no_refresh_paths = ["/verify-code", "/verify-totp", "/2fa/verify"]
//! ```
//!
//! # Environment Variables
//!
//! - `BOUNTYBOARD_BACKEND_URL` - Override `backend.url`
//! - `BOUNTYBOARD_DATA_DIR` - Override `storage.data_dir`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Backend URL used when nothing is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4000";

pub use bountyboard_types::defaults::{
    BOOKMARKS_KEY as DEFAULT_BOOKMARKS_KEY, NO_REFRESH_PATHS as DEFAULT_NO_REFRESH_PATHS,
    SESSION_KEY as DEFAULT_SESSION_KEY, TIMEOUT_SECS as DEFAULT_TIMEOUT_SECS,
    WINNERS_PREFIX as DEFAULT_WINNERS_PREFIX,
};

/// Environment variable overriding the backend URL.
pub const BACKEND_URL_ENV: &str = "BOUNTYBOARD_BACKEND_URL";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "BOUNTYBOARD_DATA_DIR";

const APP_NAME: &str = "bountyboard";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so partial configs (e.g. project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BountyboardConfig {
    /// Backend connection settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendConfig>,

    /// Local storage settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,

    /// Session refresh settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

impl BountyboardConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: BountyboardConfig) {
        if other.backend.is_some() {
            self.backend = other.backend;
        }

        if other.storage.is_some() {
            self.storage = other.storage;
        }

        if other.auth.is_some() {
            self.auth = other.auth;
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(backend) = &self.backend {
            if let Some(url) = &backend.url
                && !(url.starts_with("http://") || url.starts_with("https://"))
            {
                return Err(ConfigError::InvalidValue {
                    field: "backend.url".to_string(),
                    reason: format!("'{}' is not an http(s) URL", url),
                });
            }
            if backend.timeout_secs == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: "backend.timeout_secs".to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Effective values
    // ─────────────────────────────────────────────────────────────────────────

    /// Backend URL: `BOUNTYBOARD_BACKEND_URL`, then `backend.url`, then the default.
    pub fn backend_url(&self) -> String {
        self.backend_url_with(std::env::var(BACKEND_URL_ENV).ok())
    }

    fn backend_url_with(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|v| !v.is_empty())
            .or_else(|| self.backend.as_ref().and_then(|b| b.url.clone()))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.backend
                .as_ref()
                .and_then(|b| b.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn user_agent(&self) -> Option<String> {
        self.backend.as_ref().and_then(|b| b.user_agent.clone())
    }

    /// Data directory: `BOUNTYBOARD_DATA_DIR`, then `storage.data_dir`, then
    /// the platform data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir_with(std::env::var(DATA_DIR_ENV).ok())
    }

    fn data_dir_with(&self, env_value: Option<String>) -> PathBuf {
        if let Some(dir) = env_value.filter(|v| !v.is_empty()) {
            return expand_home(Path::new(&dir));
        }
        if let Some(dir) = self.storage.as_ref().and_then(|s| s.data_dir.as_ref()) {
            return expand_home(dir);
        }
        dirs::data_dir()
            .map(|d| d.join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from(".bountyboard"))
    }

    pub fn session_key(&self) -> String {
        self.storage
            .as_ref()
            .and_then(|s| s.session_key.clone())
            .unwrap_or_else(|| DEFAULT_SESSION_KEY.to_string())
    }

    pub fn bookmarks_key(&self) -> String {
        self.storage
            .as_ref()
            .and_then(|s| s.bookmarks_key.clone())
            .unwrap_or_else(|| DEFAULT_BOOKMARKS_KEY.to_string())
    }

    pub fn winners_prefix(&self) -> String {
        self.storage
            .as_ref()
            .and_then(|s| s.winners_prefix.clone())
            .unwrap_or_else(|| DEFAULT_WINNERS_PREFIX.to_string())
    }

    pub fn coalesce_refresh(&self) -> bool {
        self.auth
            .as_ref()
            .and_then(|a| a.coalesce_refresh)
            .unwrap_or(true)
    }

    pub fn no_refresh_paths(&self) -> Vec<String> {
        self.auth
            .as_ref()
            .and_then(|a| a.no_refresh_paths.clone())
            .unwrap_or_else(|| {
                DEFAULT_NO_REFRESH_PATHS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
    }
}

/// Replace a leading `~` with the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// `[backend]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend, without the `/api` suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Custom user agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the session, bookmark and draft files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmarks_key: Option<String>,

    /// Prefix for per-bounty winner draft keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winners_prefix: Option<String>,
}

/// `[auth]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Share one refresh between concurrent 401s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coalesce_refresh: Option<bool>,

    /// Path fragments exempt from refresh handling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_refresh_paths: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bountyboard_types::defaults;

    #[test]
    fn test_unset_values_follow_shared_defaults() {
        let config = BountyboardConfig::default();
        assert_eq!(config.session_key(), defaults::SESSION_KEY);
        assert_eq!(config.bookmarks_key(), defaults::BOOKMARKS_KEY);
        assert_eq!(config.winners_prefix(), defaults::WINNERS_PREFIX);
        assert_eq!(config.no_refresh_paths(), defaults::NO_REFRESH_PATHS);
        assert_eq!(config.timeout(), Duration::from_secs(defaults::TIMEOUT_SECS));
    }

    #[test]
    fn test_empty_config_defaults() {
        let config = BountyboardConfig::from_toml("").unwrap();
        assert_eq!(config.backend_url_with(None), DEFAULT_BACKEND_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.session_key(), "bountyboard-auth");
        assert_eq!(config.bookmarks_key(), "bountyboard-bookmarks");
        assert_eq!(config.winners_prefix(), "bountyboard-winners-");
        assert!(config.coalesce_refresh());
        assert_eq!(config.no_refresh_paths().len(), 3);
    }

    #[test]
    fn test_parse_full_config() {
        let config = BountyboardConfig::from_toml(
            r#"
[backend]
url = "https://api.example.com"
timeout_secs = 5

[storage]
data_dir = "/var/lib/bb"
bookmarks_key = "saved"

[auth]
coalesce_refresh = false
no_refresh_paths = ["/otp"]
"#,
        )
        .unwrap();

        assert_eq!(config.backend_url_with(None), "https://api.example.com");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.data_dir_with(None), PathBuf::from("/var/lib/bb"));
        assert_eq!(config.bookmarks_key(), "saved");
        assert_eq!(config.session_key(), "bountyboard-auth");
        assert!(!config.coalesce_refresh());
        assert_eq!(config.no_refresh_paths(), vec!["/otp".to_string()]);
    }

    #[test]
    fn test_env_overrides() {
        let config = BountyboardConfig::from_toml(
            r#"
[backend]
url = "https://api.example.com"

[storage]
data_dir = "/var/lib/bb"
"#,
        )
        .unwrap();

        assert_eq!(
            config.backend_url_with(Some("http://127.0.0.1:9000".into())),
            "http://127.0.0.1:9000"
        );
        assert_eq!(
            config.data_dir_with(Some("/tmp/bb".into())),
            PathBuf::from("/tmp/bb")
        );
        // Empty env values are ignored
        assert_eq!(config.backend_url_with(Some(String::new())), "https://api.example.com");
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = BountyboardConfig::from_toml("[backend]\nurl = \"ftp://x\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = BountyboardConfig::from_toml("[backend]\ntimeout_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_merge_section_override() {
        let mut base = BountyboardConfig::from_toml(
            "[backend]\nurl = \"http://a\"\n[auth]\ncoalesce_refresh = false",
        )
        .unwrap();
        let overlay = BountyboardConfig::from_toml("[backend]\nurl = \"http://b\"").unwrap();
        base.merge(overlay);

        assert_eq!(base.backend_url_with(None), "http://b");
        assert!(!base.coalesce_refresh());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = BountyboardConfig {
            backend: Some(BackendConfig {
                url: Some("http://localhost:4000".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(BountyboardConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/bb")), home.join("bb"));
        }
        assert_eq!(expand_home(Path::new("/abs")), PathBuf::from("/abs"));
    }
}
