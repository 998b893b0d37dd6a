//! Search result model
//!
//! Typed shape of the aggregation service's records and the projection of a
//! record into the row displayed (and launched) by the result browser.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;
const DATE_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A normalized, non-empty search query
///
/// The raw text is kept for display; [`SearchQuery::normalized`] yields the
/// lower-cased, `+`-joined form embedded in the outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    words: Vec<String>,
}

impl SearchQuery {
    /// Build a query from free text
    ///
    /// Returns `None` when the text contains no words.
    #[must_use]
    pub fn new(text: &str) -> Option<Self> {
        let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return None;
        }

        Some(Self {
            raw: text.trim().to_string(),
            words,
        })
    }

    /// Build a query from command-line arguments
    #[must_use]
    pub fn from_args(args: &[String]) -> Option<Self> {
        Self::new(&args.join(" "))
    }

    /// The text as the user typed it (trimmed)
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lower-cased words, in order
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Lower-cased words joined by `+`
    #[must_use]
    pub fn normalized(&self) -> String {
        self.words.join("+")
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Treat JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any JSON value the service might send for a numeric field
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl LooseNumber {
    fn into_i64(self) -> i64 {
        match self {
            Self::Int(n) => n,
            // `as` truncates toward zero and saturates at the i64 bounds
            Self::Float(f) => f as i64,
            Self::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| {
                        let f = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
                        Some(f as i64)
                    })
                    .unwrap_or_default()
            }
            Self::Other(_) => 0,
        }
    }
}

/// Read a number leniently; anything unusable becomes 0
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?.into_i64())
}

/// One record returned by the aggregation service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tracker: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_desc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publish_date: String,
    /// Size in bytes
    #[serde(default, deserialize_with = "lenient_i64")]
    pub size: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub seeders: i64,
    #[serde(default, rename = "MagnetUri")]
    pub magnet_uri: Option<String>,
}

impl SearchResult {
    /// Whether the record carries something the launcher can open
    #[must_use]
    pub fn is_launchable(&self) -> bool {
        self.magnet_uri.as_deref().is_some_and(|m| !m.is_empty()) || !self.link.is_empty()
    }

    /// Project this record into a browser row
    #[must_use]
    pub fn to_row(&self) -> TableRow {
        to_row(self)
    }
}

/// The results of one search, in response order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    results: Vec<SearchResult>,
    skipped: usize,
}

impl ResultSet {
    /// Create a result set
    ///
    /// `skipped` counts records dropped while decoding.
    #[must_use]
    pub const fn new(results: Vec<SearchResult>, skipped: usize) -> Self {
        Self { results, skipped }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of records that could not be decoded or launched
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Project every result into a browser row
    #[must_use]
    pub fn to_rows(&self) -> Vec<TableRow> {
        self.results.iter().map(to_row).collect()
    }
}

impl From<Vec<SearchResult>> for ResultSet {
    fn from(results: Vec<SearchResult>) -> Self {
        Self::new(results, 0)
    }
}

/// What a row opens when selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// A `magnet:` URI
    Magnet(String),
    /// A web page link
    Web(String),
}

impl LaunchTarget {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Magnet(uri) | Self::Web(uri) => uri,
        }
    }

    /// Short label for status messages
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Magnet(_) => "magnet link",
            Self::Web(_) => "web link",
        }
    }
}

/// A search result projected for display in the browser table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub title: String,
    pub tracker: String,
    pub category: String,
    /// Formatted publish date, or the raw string when it didn't parse
    pub date: String,
    /// Human-readable size
    pub size: String,
    pub seeders: i64,
    /// Not displayed; carried for launching
    pub magnet_uri: String,
    /// Not displayed; carried for launching
    pub link: String,
    /// Sort key for the size column
    pub size_bytes: i64,
    /// Sort key for the date column
    pub published: Option<DateTime<FixedOffset>>,
}

impl TableRow {
    /// Resolve what selecting this row should open
    ///
    /// The magnet URI wins over the link.
    #[must_use]
    pub fn launch_target(&self) -> Option<LaunchTarget> {
        if !self.magnet_uri.is_empty() {
            Some(LaunchTarget::Magnet(self.magnet_uri.clone()))
        } else if !self.link.is_empty() {
            Some(LaunchTarget::Web(self.link.clone()))
        } else {
            None
        }
    }
}

/// Project a search result into a table row
///
/// Total: malformed fields degrade the formatting, never the row.
#[must_use]
pub fn to_row(result: &SearchResult) -> TableRow {
    let published = parse_publish_date(&result.publish_date);
    let date = published.map_or_else(
        || result.publish_date.clone(),
        |dt| dt.format(DATE_DISPLAY_FORMAT).to_string(),
    );

    TableRow {
        title: result.title.clone(),
        tracker: result.tracker.clone(),
        category: result.category_desc.clone(),
        date,
        size: format_size(result.size),
        seeders: result.seeders,
        magnet_uri: result.magnet_uri.clone().unwrap_or_default(),
        link: result.link.clone(),
        size_bytes: result.size,
        published,
    }
}

/// Format a byte count as megabytes with two decimals
///
/// Negative counts are shown as zero.
#[must_use]
pub fn format_size(bytes: i64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let megabytes = bytes.max(0) as f64 / BYTES_PER_MEGABYTE;
    format!("{megabytes:.2} MB")
}

/// Parse a publish date as RFC 3339, falling back to a naive timestamp (UTC)
#[must_use]
pub fn parse_publish_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}
