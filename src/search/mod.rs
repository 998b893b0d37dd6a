//! Searching the aggregation service
//!
//! - [`model`]: results, rows and query normalisation
//! - [`client`]: the HTTP client and response decoding
//! - [`task`]: running a search in the background while the UI animates

pub mod client;
mod error;
pub mod model;
pub mod task;

pub use client::{JackettClient, decode_response};
pub use error::{Result, SearchError};
pub use model::{LaunchTarget, ResultSet, SearchQuery, SearchResult, TableRow, to_row};
pub use task::SearchTask;
