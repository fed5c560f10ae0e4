use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::EolError;
use crate::output::OutputFormat;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default lifetime of a cached API response (5 minutes)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Interval after which expired cache entries are swept (10 minutes)
pub const CACHE_CLEANUP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Default timeout for a single API request (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base URL of the endoflife.date API
pub const DEFAULT_BASE_URL: &str = "https://endoflife.date/api";

/// Config files looked up when `--config` is not given, in order
const DEFAULT_CONFIG_PATHS: [&str; 2] = ["config.yaml", "config/config.yaml"];

/// eolctl configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub log: LogConfig,
    pub output: OutputConfig,
}

/// Upstream API configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Response cache configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    pub enabled: bool,
    /// Lifetime of cached responses in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit path must exist and parse. Without one, `./config.yaml` and
    /// `./config/config.yaml` are tried in order and defaults are used when
    /// neither exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, EolError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let path = Path::new(candidate);
            if path.is_file() {
                return Self::from_file(path);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, EolError> {
        debug!("Loading config from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| {
            EolError::Config(format!("failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            EolError::Config(format!("failed to parse config file {}: {}", path.display(), e))
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to null, which serde_yaml rejects for structs
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

/// Returns the path to the data directory for eolctl.
/// Uses $XDG_DATA_HOME/eolctl if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.eolctl,
/// or ./.eolctl if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the response cache file.
pub fn cache_path() -> PathBuf {
    data_dir().join("cache.json")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("eolctl.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    xdg_data_home
        .filter(|dir| !dir.is_empty())
        .map(|dir| PathBuf::from(dir).join("eolctl"))
        .or_else(|| home_dir.map(|home| home.join(".eolctl")))
        .unwrap_or_else(|| PathBuf::from(".eolctl"))
}
