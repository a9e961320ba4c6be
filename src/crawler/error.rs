// src/crawler/error.rs
// =============================================================================
// Everything that can stop a crawl.
//
// There are no warnings and no retries: each variant below is fatal, and the
// first one observed is what Crawler::crawl returns. Note that 4xx/5xx HTTP
// responses are NOT errors, they are ordinary results.
// =============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::sink::SinkError;
use crate::source::SourceError;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// Reading the list of URLs failed (I/O error or oversized entry)
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The configured request method is not a valid HTTP method
    #[error("invalid request method {method:?}")]
    InvalidMethod { method: String },

    /// The line could not be turned into a request URL
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// reqwest refused to build a request from an otherwise valid URL
    #[error("failed to build request for {url:?}: {source}")]
    BuildRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request was sent but no response came back (DNS, connection, TLS, ...)
    #[error("request to {url:?} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The crawl was cancelled while work was still in flight
    #[error("crawl canceled")]
    Cancelled,

    /// The sink failed to store a result
    #[error("{0}")]
    Sink(#[source] Arc<SinkError>),

    /// A fetch task or the consumer panicked
    #[error("crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The HTTP client could not be created
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_error_message_is_kept() {
        let err = CrawlError::Sink(Arc::new(SinkError::Rejected("banana".to_string())));
        assert!(err.to_string().contains("banana"));
    }

    #[test]
    fn test_source_error_is_transparent() {
        let err = CrawlError::from(SourceError::TooLong { limit: 10 });
        assert_eq!(err.to_string(), "URL entry is longer than 10 bytes");
    }
}
