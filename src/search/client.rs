//! Jackett aggregation service client
//!
//! Builds the results URL for a query and decodes the JSON response into a
//! [`ResultSet`]. Records that are not objects, or that have nothing to
//! launch, are skipped rather than failing the whole search; bad field
//! values degrade to defaults.

use super::error::{Result, SearchError};
use super::model::{ResultSet, SearchQuery, SearchResult};
use crate::config::{ApiKey, PrivateerConfig};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

/// Path of the aggregated results endpoint, relative to the base URL
const INDEXERS_PATH: &str = "api/v2.0/indexers";

/// Encoded name of the repeated tracker filter parameter (`Tracker[]`)
const TRACKER_PARAM: &str = "Tracker%5B%5D";

/// Response envelope; records are decoded one by one
#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(rename = "Results", default)]
    results: Option<Vec<serde_json::Value>>,
}

/// HTTP client for the aggregation service
#[derive(Debug, Clone)]
pub struct JackettClient {
    http: Client,
    base_url: String,
    indexer: String,
    trackers: Vec<String>,
    api_key: ApiKey,
}

impl JackettClient {
    /// Create a client from configuration and the bootstrapped API key
    ///
    /// # Errors
    ///
    /// Returns `SearchError::ClientBuild` if the HTTP client cannot be constructed.
    pub fn new(config: &PrivateerConfig, api_key: ApiKey) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(SearchError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            indexer: config.indexer.clone(),
            trackers: config.trackers.clone(),
            api_key,
        })
    }

    /// Build the results URL for a query
    ///
    /// Each word is percent-encoded on its own and the words are joined with a
    /// literal `+`, so the service sees them as separate terms.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidUrl` if the configured base URL is malformed.
    pub fn search_url(&self, query: &SearchQuery) -> Result<Url> {
        let terms = query
            .words()
            .iter()
            .map(|word| urlencoding::encode(word).into_owned())
            .collect::<Vec<_>>()
            .join("+");

        let mut url = format!(
            "{}/{INDEXERS_PATH}/{}/results?apikey={}&Query={terms}",
            self.base_url,
            self.indexer,
            urlencoding::encode(self.api_key.expose()),
        );

        for tracker in &self.trackers {
            url.push('&');
            url.push_str(TRACKER_PARAM);
            url.push('=');
            url.push_str(&urlencoding::encode(tracker));
        }

        Url::parse(&url).map_err(|e| SearchError::InvalidUrl(format!("{}: {e}", self.base_url)))
    }

    /// Run one search against the service
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Transport` on connection failures or timeouts,
    /// `SearchError::Status` for non-success responses and
    /// `SearchError::Decode` when the body is not a results document.
    pub async fn search(&self, query: &SearchQuery) -> Result<ResultSet> {
        let url = self.search_url(query)?;
        tracing::debug!(
            query = %query.normalized(),
            trackers = self.trackers.len(),
            "sending search request"
        );

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "search request rejected");
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let results = decode_response(&body)?;
        tracing::info!(
            query = %query.normalized(),
            count = results.len(),
            skipped = results.skipped(),
            "search completed"
        );
        Ok(results)
    }
}

/// Decode a results document
///
/// Records that fail to decode, or that carry neither a magnet URI nor a
/// link, are dropped and counted in [`ResultSet::skipped`].
///
/// # Errors
///
/// Returns `SearchError::Decode` if the body is not a JSON object.
pub fn decode_response(body: &str) -> Result<ResultSet> {
    let raw: RawResponse = serde_json::from_str(body)?;
    let records = raw.results.unwrap_or_default();

    let mut results = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for record in records {
        match serde_json::from_value::<SearchResult>(record) {
            Ok(result) if result.is_launchable() => results.push(result),
            Ok(result) => {
                tracing::debug!(title = %result.title, "skipping result without magnet or link");
                skipped += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed search result");
                skipped += 1;
            }
        }
    }

    Ok(ResultSet::new(results, skipped))
}
