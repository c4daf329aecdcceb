//! Taskboard configuration management using Figment
//!
//! Configuration is merged from built-in defaults, configuration files and
//! `TASKBOARD_*` environment variables, then validated.
//!
//! # Configuration Files
//!
//! - Global: `<config dir>/taskboard/config.{toml,yaml,yml,json}`
//! - Project: `./taskboard.{toml,yaml,yml,json}`
//!
//! ## Example TOML Configuration
//!
//! ```toml
//! [api]
//! base_url = "https://boards.example.com/api"
//! timeout_secs = 15
//!
//! [storage]
//! snapshot_path = "/home/me/.local/share/taskboard/state.json"
//! ```
//!
//! Environment variables use `__` for nesting, e.g. `TASKBOARD_API__BASE_URL`.
//!
//! # Quick Start
//!
//! ```no_run
//! let config = taskboard_config::load_configuration()?;
//! println!("talking to {}", config.api.base_url);
//! # Ok::<(), taskboard_config::ConfigError>(())
//! ```

mod discovery;
mod error;
mod provider;
mod types;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
pub use error::ConfigError;
pub use provider::{ConfigOverrides, ConfigProvider, ENV_PREFIX};
pub use types::{
    ApiConfig, AuthConfig, StorageConfig, TaskboardConfig, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT_SECS, SNAPSHOT_FILE_NAME,
};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load configuration from every default source
pub fn load_configuration() -> ConfigResult<TaskboardConfig> {
    ConfigProvider::new().load()
}
