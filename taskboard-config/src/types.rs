//! Typed configuration sections

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default REST API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Snapshot file name used when no explicit path is configured
pub const SNAPSHOT_FILE_NAME: &str = "taskboard-state.json";

/// Root configuration for the Taskboard client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskboardConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("taskboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Bearer token handed over by the login flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Where the persisted store snapshot lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured snapshot path, or the file under the platform data directory.
    ///
    /// Returns `None` when neither is available; the store then stays in memory.
    pub fn resolved_snapshot_path(&self) -> Option<PathBuf> {
        self.snapshot_path.clone().or_else(|| {
            dirs::data_dir().map(|dir| dir.join("taskboard").join(SNAPSHOT_FILE_NAME))
        })
    }
}

impl TaskboardConfig {
    /// Reject values the client cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::invalid_value("api.base_url", "must not be empty"));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ConfigError::invalid_value(
                "api.base_url",
                format!("unsupported scheme in '{}'", self.api.base_url),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "api.timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TaskboardConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert!(config.auth.token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = TaskboardConfig::default();
        config.api.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "api.timeout_secs"
        ));
    }

    #[test]
    fn test_bad_scheme_rejected() {
        let mut config = TaskboardConfig::default();
        config.api.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());

        config.api.base_url = "   ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_snapshot_path_wins() {
        let storage = StorageConfig {
            snapshot_path: Some(PathBuf::from("/tmp/state.json")),
        };
        assert_eq!(
            storage.resolved_snapshot_path(),
            Some(PathBuf::from("/tmp/state.json"))
        );
    }
}
