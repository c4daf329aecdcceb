//! Configuration file discovery
//!
//! Looks for Taskboard configuration files in the user's config directory and in
//! the current working directory, returning them in merge order.

use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Represents a discovered configuration file with metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Full path to the configuration file
    pub path: PathBuf,
    /// Detected format of the file (TOML, YAML, JSON)
    pub format: ConfigFormat,
    /// Scope indicating where the file was found (global vs project)
    pub scope: ConfigScope,
}

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Where a configuration file was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigScope {
    /// `<config dir>/taskboard/config.*`
    Global,
    /// `./taskboard.*`
    Project,
}

const GLOBAL_FILE_NAMES: [&str; 4] = ["config.toml", "config.yaml", "config.yml", "config.json"];
const PROJECT_FILE_NAMES: [&str; 4] = [
    "taskboard.toml",
    "taskboard.yaml",
    "taskboard.yml",
    "taskboard.json",
];

/// File discovery service for finding configuration files
#[derive(Debug, Default)]
pub struct FileDiscovery {
    project_dir: Option<PathBuf>,
    global_dir: Option<PathBuf>,
}

impl FileDiscovery {
    /// Discovery rooted at the current directory and the platform config directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Discovery with explicit directories, bypassing platform lookup
    pub fn with_directories(project_dir: Option<PathBuf>, global_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            global_dir,
        }
    }

    /// Discover all configuration files, lowest precedence first
    pub fn discover_all(&self) -> Vec<ConfigFile> {
        let project_dir = self
            .project_dir
            .clone()
            .or_else(|| std::env::current_dir().ok());
        let global_dir = self
            .global_dir
            .clone()
            .or_else(|| dirs::config_dir().map(|dir| dir.join("taskboard")));

        let mut files = Vec::new();
        if let Some(ref dir) = global_dir {
            files.extend(Self::search_directory(dir, &GLOBAL_FILE_NAMES, ConfigScope::Global));
        }
        if let Some(ref dir) = project_dir {
            files.extend(Self::search_directory(dir, &PROJECT_FILE_NAMES, ConfigScope::Project));
        }

        files.sort_by_key(|f| f.scope);
        debug!("Discovered {} configuration files", files.len());
        files
    }

    fn search_directory(dir: &Path, names: &[&str], scope: ConfigScope) -> Vec<ConfigFile> {
        if !dir.exists() {
            trace!("Directory does not exist: {}", dir.display());
            return Vec::new();
        }
        if !dir.is_dir() {
            warn!("Path exists but is not a directory: {}", dir.display());
            return Vec::new();
        }

        names
            .iter()
            .map(|name| dir.join(name))
            .filter(|candidate| candidate.is_file())
            .filter_map(|path| {
                let format = ConfigFormat::from_extension(path.extension()?.to_str()?)?;
                trace!("Found config: {} ({:?})", path.display(), format);
                Some(ConfigFile {
                    path,
                    format,
                    scope,
                })
            })
            .collect()
    }
}
