//! Command-line interface definitions and parsing
//!
//! privateer takes an optional query; everything else tunes where the
//! configuration, the API key and the search service live.
//!
//! # Examples
//!
//! ```bash
//! # Prompt for a query
//! privateer
//!
//! # Search straight away
//! privateer big buck bunny
//!
//! # One-off key and endpoint, nothing persisted
//! privateer --api-key abc123 --base-url http://nas:9117 ubuntu
//!
//! # Make an endpoint override permanent
//! privateer --base-url http://nas:9117 --write-config
//! ```

use crate::config::{ApiKey, PrivateerConfig};
use crate::search::SearchQuery;
use clap::Parser;
use config::ConfigError;
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "privateer")]
#[command(about = "Search a Jackett instance and open the results", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Search query; prompts for one when omitted
    #[arg(value_name = "QUERY")]
    pub query: Vec<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Jackett base URL (overrides config)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Credential file location (overrides config)
    #[arg(long, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Use this API key for this run only; nothing is saved
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Save the resolved configuration (including overrides) and exit
    #[arg(long, conflicts_with = "print_config")]
    pub write_config: bool,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Load configuration and apply command-line overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration cannot be loaded.
    pub fn resolve_config(&self) -> Result<PrivateerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => PrivateerConfig::load_from(path)?,
            None => PrivateerConfig::load()?,
        };

        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(credentials) = &self.credentials {
            config.credentials_path = Some(credentials.clone());
        }

        Ok(config)
    }

    /// The configuration file in use: `--config`, or the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the default location cannot be determined.
    pub fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => PrivateerConfig::config_path(),
        }
    }

    /// Write `config` to [`Cli::config_path`], returning where it went
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save_config(&self, config: &PrivateerConfig) -> Result<PathBuf, ConfigError> {
        let path = self.config_path()?;
        config.save_to(&path)?;
        tracing::info!(path = %path.display(), "configuration written");
        Ok(path)
    }

    /// The query given on the command line, if it has any words
    #[must_use]
    pub fn search_query(&self) -> Option<SearchQuery> {
        SearchQuery::from_args(&self.query)
    }

    /// The one-off API key, if given and not blank
    #[must_use]
    pub fn api_key(&self) -> Option<ApiKey> {
        self.api_key.as_deref().and_then(ApiKey::new)
    }
}
