//! Configuration provider using Figment

use crate::discovery::{ConfigFile, ConfigFormat, FileDiscovery};
use crate::error::ConfigError;
use crate::types::TaskboardConfig;
use crate::ConfigResult;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "TASKBOARD_";

/// Configuration provider using figment
///
/// Sources are merged in precedence order (later sources override earlier ones):
/// 1. Built-in defaults
/// 2. Global configuration file
/// 3. Project configuration file
/// 4. `TASKBOARD_*` environment variables
pub struct ConfigProvider {
    discovery: FileDiscovery,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self {
            discovery: FileDiscovery::new(),
        }
    }

    /// Use a specific discovery (tests point this at temp directories)
    pub fn with_discovery(discovery: FileDiscovery) -> Self {
        Self { discovery }
    }

    /// Load and validate the configuration from every source
    pub fn load(&self) -> ConfigResult<TaskboardConfig> {
        let figment = self.build_figment();
        let config: TaskboardConfig = figment.extract()?;
        config.validate()?;

        debug!(
            base_url = %config.api.base_url,
            timeout_secs = config.api.timeout_secs,
            authenticated = config.auth.token.is_some(),
            "Loaded taskboard configuration"
        );
        Ok(config)
    }

    fn build_figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(TaskboardConfig::default()));

        for file in self.discovery.discover_all() {
            trace!("Merging config file: {}", file.path.display());
            figment = figment.merge(Self::file_provider(&file));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn file_provider(file: &ConfigFile) -> Figment {
        match file.format {
            ConfigFormat::Toml => Figment::from(Toml::file(&file.path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(&file.path)),
            ConfigFormat::Json => Figment::from(Json::file(&file.path)),
        }
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Values supplied on the command line, applied after every other source
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Apply the overrides and re-validate
    pub fn apply(self, mut config: TaskboardConfig) -> Result<TaskboardConfig, ConfigError> {
        if let Some(base_url) = self.base_url {
            config.api.base_url = base_url;
        }
        if let Some(token) = self.token {
            config.auth.token = Some(token);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.api.timeout_secs = timeout_secs;
        }
        config.validate()?;
        Ok(config)
    }
}
