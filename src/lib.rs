//! Privateer - a terminal front end for Jackett searches
//!
//! Takes a query, runs it against a local Jackett instance, and shows the
//! results in a sortable table. Selecting a row hands its magnet link (or
//! web link) to the system's default handler.

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod launch;
pub mod logging;
pub mod search;
pub mod ui;
pub mod workflow;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum PrivateerError {
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Search client could not be set up
    #[error("Search error: {0}")]
    SearchError(#[from] search::SearchError),
    /// Terminal failure
    #[error("UI error: {0}")]
    UiError(#[from] ui::UiError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for privateer operations
pub type Result<T> = std::result::Result<T, PrivateerError>;
