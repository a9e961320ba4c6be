// src/lib.rs
// =============================================================================
// craurl as a library: everything except argument parsing and logging setup.
//
// Modules:
// - source: reads URLs line by line from any async reader
// - crawler: the batched, cancellable crawl pipeline
// - sink: where results are written (text table or JSON Lines)
// =============================================================================

pub mod crawler;
pub mod sink;
pub mod source;

pub use crawler::{CrawlError, CrawlReport, CrawlResult, Crawler, CrawlerConfig};
pub use sink::{JsonLinesSink, Sink, SinkError, TableSink};
