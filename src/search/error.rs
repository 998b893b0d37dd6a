//! Search-specific error types
//!
//! Errors that can occur while querying the aggregation service:
//!
//! - **`Transport`**: the request never produced a response (connection refused, timeout)
//! - **`Status`**: the service answered with a non-success HTTP status
//! - **`Decode`**: the response body was not the expected JSON document
//! - **`Cancelled`**: the user quit while the request was in flight
//! - **`TaskAborted`**: the background task ended without reporting back

use thiserror::Error;

/// Search-specific errors
#[derive(Debug, Error)]
pub enum SearchError {
    /// Failed to build the HTTP client
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The configured endpoint is not a valid URL
    #[error("Invalid search URL: {0}")]
    InvalidUrl(String),

    /// Connection, DNS or timeout failure
    #[error("Could not reach the search service: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Search service answered with HTTP {status}")]
    Status {
        /// The HTTP status code
        status: u16,
    },

    /// Malformed response body
    #[error("Could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The search was cancelled before it completed
    #[error("Search was cancelled")]
    Cancelled,

    /// The background task went away without a result
    #[error("Search task ended unexpectedly")]
    TaskAborted,
}

impl SearchError {
    /// Whether the search screen should offer a retry for this error
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::TaskAborted
        )
    }
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
