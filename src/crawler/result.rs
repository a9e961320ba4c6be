// src/crawler/result.rs
// =============================================================================
// The record produced by one successful fetch.
//
// A CrawlResult is created once by a fetch task, travels through the relay,
// and is handed to the sink exactly once. Duplicated URLs in the input
// produce duplicated results; nothing is deduplicated.
// =============================================================================

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// The observed status of one URL at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    /// The URL exactly as it appeared in the source
    pub url: String,
    /// HTTP status code (4xx and 5xx included, they are valid observations)
    pub status: u16,
    /// When the response was received, in UTC
    pub timestamp: DateTime<Utc>,
}

impl CrawlResult {
    /// Builds a result stamped with the current UTC time.
    pub fn observed_now(url: String, status: u16) -> Self {
        Self {
            url,
            status,
            timestamp: Utc::now(),
        }
    }

    /// RFC 3339 rendering used by the table output, e.g. `2024-05-01T10:00:00.123Z`.
    pub fn timestamp_rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
