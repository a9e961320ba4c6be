// src/sink/mod.rs
// =============================================================================
// This module defines where crawl results end up.
//
// The crawler only knows the Sink trait. It calls it from exactly one task
// (the result consumer), one result at a time, so implementations never need
// locking.
//
// Submodules:
// - table: fixed-width text table with a header line (the default output)
// - json: one JSON object per line (--json)
// =============================================================================

mod json;
mod table;

use async_trait::async_trait;
use thiserror::Error;

use crate::crawler::CrawlResult;

pub use json::JsonLinesSink;
pub use table::TableSink;

/// Why a sink refused or failed to store a result.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing to the underlying output failed
    #[error("failed to write result: {0}")]
    Io(#[from] std::io::Error),

    /// The result couldn't be serialized
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),

    /// The sink rejected the result for its own reasons
    #[error("result rejected: {0}")]
    Rejected(String),
}

/// Persists crawl results.
///
/// Any error returned here is fatal to the crawl: the consumer stops calling
/// the sink and the crawl terminates with that error.
#[async_trait]
pub trait Sink: Send + 'static {
    /// Stores a single result.
    async fn store_result(&mut self, result: &CrawlResult) -> Result<(), SinkError>;

    /// Called once after the last result when the input was fully consumed.
    async fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}
