// src/crawler/config.rs
// =============================================================================
// Settings for one crawl, passed to Crawler::new.
//
// The request method lives here (not in a global) so two crawls in the same
// process, or two tests running in parallel, can never affect each other.
// =============================================================================

/// Default number of URLs fetched concurrently in one batch.
pub const DEFAULT_MAX_CONCURRENCY: usize = 100;

/// Default HTTP method used for every request.
pub const DEFAULT_METHOD: &str = "GET";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlerConfig {
    /// How many lines are read and fetched together before waiting for the batch
    pub max_concurrency: usize,
    /// HTTP method, parsed by every fetch task (an invalid one fails the task)
    pub method: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            method: DEFAULT_METHOD.to_string(),
        }
    }
}

impl CrawlerConfig {
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    #[cfg(test)]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Batch size actually used; a batch always holds at least one line.
    pub fn batch_size(&self) -> usize {
        self.max_concurrency.max(1)
    }
}
