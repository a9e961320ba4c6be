// src/crawler/relay.rs
// =============================================================================
// The result relay: fetch tasks -> one consumer -> the sink.
//
// Pieces:
// - channel(): the queue carrying results. Its capacity is 1, so a slow or
//   failed sink immediately holds back every fetch task trying to hand off.
// - FailureSignal: a one-shot cell the consumer trips when the sink fails.
//   Fetch tasks waiting to hand off a result watch it, so they fail with the
//   sink's error instead of waiting forever for a consumer that is gone.
// - consume_results(): the single task that owns the sink.
// =============================================================================

use std::sync::{Arc, OnceLock};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{CrawlError, CrawlResult};
use crate::sink::{Sink, SinkError};

/// Results waiting between a fetch task and the consumer.
const RELAY_CAPACITY: usize = 1;

pub(crate) fn channel() -> (mpsc::Sender<CrawlResult>, mpsc::Receiver<CrawlResult>) {
    mpsc::channel(RELAY_CAPACITY)
}

/// Set at most once, by the consumer, when the sink fails.
///
/// Raising it also cancels the crawl scope, so in-flight requests are
/// aborted and no further batch is dispatched.
#[derive(Debug, Clone)]
pub(crate) struct FailureSignal {
    error: Arc<OnceLock<Arc<SinkError>>>,
    raised: CancellationToken,
    scope: CancellationToken,
}

impl FailureSignal {
    pub(crate) fn new(scope: CancellationToken) -> Self {
        Self {
            error: Arc::default(),
            raised: CancellationToken::new(),
            scope,
        }
    }

    /// Records the sink failure, wakes everyone waiting in `raised`, then
    /// cancels the crawl scope.
    fn raise(&self, error: SinkError) -> CrawlError {
        // Only the first failure is kept; the consumer stops after it anyway
        let _ = self.error.set(Arc::new(error));
        self.raised.cancel();
        self.scope.cancel();
        self.current()
    }

    /// Resolves once the sink has failed, with the sink's error.
    pub(crate) async fn raised(&self) -> CrawlError {
        self.raised.cancelled().await;
        self.current()
    }

    /// The sink's error if it failed, otherwise a plain cancellation.
    pub(crate) fn current(&self) -> CrawlError {
        match self.error.get() {
            Some(error) => CrawlError::Sink(Arc::clone(error)),
            None => CrawlError::Cancelled,
        }
    }
}

// Drains the relay into the sink until the relay closes
//
// Returns how many results the sink accepted. Three ways out:
// - relay closed (input dispatched, or the crawl is winding down after an
//   error): flush the sink, Ok(stored)
// - sink error: trip the failure signal, Err(that error)
// - crawl scope cancelled: flush what was stored and stop, the dispatcher
//   reports the cancellation
pub(crate) async fn consume_results<S: Sink>(
    mut sink: S,
    mut relay: mpsc::Receiver<CrawlResult>,
    scope: CancellationToken,
    failure: FailureSignal,
) -> Result<usize, CrawlError> {
    let mut stored = 0;

    loop {
        let result = tokio::select! {
            biased;
            _ = scope.cancelled() => {
                debug!(stored, "result consumer stopped by cancellation");
                if let Err(e) = sink.flush().await {
                    warn!(error = %e, "sink failed to flush after cancellation");
                }
                return Ok(stored);
            }
            next = relay.recv() => match next {
                Some(result) => result,
                None => break,
            },
        };

        if let Err(e) = sink.store_result(&result).await {
            warn!(url = %result.url, error = %e, "sink failed to store result");
            return Err(failure.raise(e));
        }
        stored += 1;
        debug!(url = %result.url, status = result.status, "result stored");
    }

    if let Err(e) = sink.flush().await {
        warn!(error = %e, "sink failed to flush");
        return Err(failure.raise(e));
    }

    Ok(stored)
}
