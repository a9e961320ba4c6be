// src/crawler/mod.rs
// =============================================================================
// This module checks every URL of a source and records what it observed.
//
// Submodules:
// - config: CrawlerConfig (batch size, request method)
// - error: CrawlError, everything that can stop a crawl
// - result: CrawlResult, one (url, status, timestamp) record
// - fetch: one fetch task (GET a URL, hand the result to the relay)
// - relay: the results channel and the single task that feeds the sink
// - dispatcher: the Crawler itself, the batch loop tying it all together
//
// Data flow:
//   LineSource -> Crawler (batches) -> N fetch tasks -> relay -> consumer -> Sink
// =============================================================================

mod config;
mod dispatcher;
mod error;
mod fetch;
mod relay;
mod result;

pub use config::{CrawlerConfig, DEFAULT_MAX_CONCURRENCY};
pub use dispatcher::{CrawlReport, Crawler};
pub use error::CrawlError;
pub use result::CrawlResult;
