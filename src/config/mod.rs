//! Configuration module for privateer
//!
//! Manages the service endpoint, tracker allow-list and file locations.
//! Settings are layered: built-in defaults, then an optional TOML file in the
//! user's config directory, then `PRIVATEER_*` environment variables.

mod credentials;

pub use credentials::{ApiKey, CredentialFile};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "privateer";
const CONFIG_FILE: &str = "config.toml";
const CREDENTIALS_FILE: &str = "privateer.json";
const LOG_FILE: &str = "privateer.log";

/// Upstream trackers queried by default
pub const DEFAULT_TRACKERS: &[&str] = &[
    "1337x",
    "bitsearch",
    "eztv",
    "gamestorrents",
    "internetarchive",
    "itorrent",
    "kickasstorrents-to",
    "kickasstorrents-ws",
    "limetorrents",
    "moviesdvdr",
    "nyaasi",
    "pctorrent",
    "rutor",
    "rutracker-ru",
    "solidtorrents",
    "torrentfunk",
    "yts",
];

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PrivateerConfig {
    /// Base URL of the Jackett instance
    pub base_url: String,

    /// Indexer filter used in the results path (e.g. `all`, `test:passed`)
    pub indexer: String,

    /// Trackers passed as `Tracker[]` filters
    pub trackers: Vec<String>,

    /// Timeout for the search request
    pub request_timeout_secs: u64,

    /// UI refresh interval while waiting for input
    pub tick_rate_ms: u64,

    /// Where the API key is stored; defaults to the config directory
    pub credentials_path: Option<PathBuf>,

    /// Log file; defaults to the local data directory
    pub log_file: Option<PathBuf>,

    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for PrivateerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9117".to_string(),
            indexer: "test:passed".to_string(),
            trackers: DEFAULT_TRACKERS.iter().map(ToString::to_string).collect(),
            request_timeout_secs: 60,
            tick_rate_ms: 80,
            credentials_path: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl PrivateerConfig {
    /// Get the path to the default config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from the default location
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment overrides cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific file, falling back to defaults
    ///
    /// Fields absent from every source keep their `Default` value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment overrides cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("PRIVATEER")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("trackers"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Resolve where the API key lives
    ///
    /// Falls back to `privateer.json` in the working directory when no
    /// config directory exists.
    #[must_use]
    pub fn credentials_path(&self) -> PathBuf {
        self.credentials_path.clone().unwrap_or_else(|| {
            dirs::config_dir().map_or_else(
                || PathBuf::from(CREDENTIALS_FILE),
                |dir| dir.join(APP_DIR).join(CREDENTIALS_FILE),
            )
        })
    }

    /// Resolve the log file location, if any
    #[must_use]
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::data_local_dir().map(|dir| dir.join(APP_DIR).join(LOG_FILE)))
    }

    /// Render a short human-readable summary
    #[must_use]
    pub fn summary(&self) -> String {
        let log = self
            .log_path()
            .map_or_else(|| "(disabled)".to_string(), |p| p.display().to_string());

        format!(
            "base_url:     {}\nindexer:      {}\ntrackers:     {}\ntimeout:      {}s\ncredentials:  {}\nlog file:     {}\nlog level:    {}",
            self.base_url,
            self.indexer,
            self.trackers.join(", "),
            self.request_timeout_secs,
            self.credentials_path().display(),
            log,
            self.log_level,
        )
    }
}
