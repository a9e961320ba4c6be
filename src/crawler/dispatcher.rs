// src/crawler/dispatcher.rs
// =============================================================================
// The crawl loop.
//
// How it works:
// 1. Start the result consumer (it owns the sink for the whole crawl)
// 2. Read up to `max_concurrency` lines and spawn one fetch task per line
// 3. If reading failed, abort the tasks of the batch and stop
// 4. Wait for the whole batch; the first task error aborts the others
// 5. If the input is exhausted, close the relay and wait for the consumer
// 6. Otherwise go back to 2 with the next batch, unless the crawl scope was
//    cancelled meanwhile (a sink failure cancels it too)
//
// On every error path the relay is closed and the consumer is awaited, so
// results already handed off are stored and flushed before we return.
//
// Batches are strict windows: no line of batch N+1 is even read before every
// task of batch N has finished. Inside a batch, results reach the sink in
// whatever order the responses arrive.
//
// Rust concepts:
// - JoinSet: a group of spawned tasks that is aborted as a whole when dropped
// - CancellationToken: child tokens are cancelled with their parent
// - Destructuring `self` so each field can be moved to a different task
// =============================================================================

use reqwest::Client;
use tokio::io::AsyncRead;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::fetch::{fetch_url, FetchContext};
use super::relay::{self, FailureSignal};
use super::{CrawlError, CrawlerConfig};
use crate::sink::Sink;
use crate::source::LineSource;

/// What a successful crawl did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlReport {
    /// Number of fetch tasks launched (one per input line)
    pub dispatched: usize,
    /// Number of results the sink accepted
    pub stored: usize,
}

/// Checks every URL of a line-oriented source and stores the results in a sink.
pub struct Crawler<R, S> {
    source: LineSource<R>,
    sink: S,
    config: CrawlerConfig,
    client: Client,
}

impl<R, S> Crawler<R, S>
where
    R: AsyncRead + Unpin,
    S: Sink,
{
    pub fn new(source: R, sink: S, config: CrawlerConfig) -> Result<Self, CrawlError> {
        let client = Client::builder().build().map_err(CrawlError::Client)?;

        Ok(Self {
            source: LineSource::new(source),
            sink,
            config,
            client,
        })
    }

    /// Runs the crawl to completion.
    ///
    /// Cancelling `cancel` stops the crawl with [`CrawlError::Cancelled`].
    /// Results stored before a failure stay stored.
    pub async fn crawl(self, cancel: CancellationToken) -> Result<CrawlReport, CrawlError> {
        let Self {
            mut source,
            sink,
            config,
            client,
        } = self;

        // Everything below is cancelled when we return, whatever the outcome
        let scope = cancel.child_token();
        let _scope_guard = scope.clone().drop_guard();

        let (relay_tx, relay_rx) = relay::channel();
        let failure = FailureSignal::new(scope.clone());
        let consumer = tokio::spawn(relay::consume_results(
            sink,
            relay_rx,
            scope.clone(),
            failure.clone(),
        ));

        let ctx = FetchContext {
            client,
            method: config.method.clone(),
            relay: relay_tx,
            failure: failure.clone(),
        };

        info!(batch_size = config.batch_size(), method = %config.method, "crawl started");

        let dispatched = dispatch_batches(&mut source, ctx, &scope, &failure, config.batch_size()).await;

        let dispatched = match dispatched {
            Ok(dispatched) => dispatched,
            Err(e) => {
                // The relay is closed by now: let the consumer store what was
                // already handed off before reporting the error
                let stored = match consumer.await {
                    Ok(Ok(stored)) => stored,
                    _ => 0,
                };
                warn!(error = %e, stored, "crawl failed");
                return Err(e);
            }
        };

        let stored = tokio::select! {
            biased;
            _ = scope.cancelled() => Err(failure.current()),
            joined = consumer => joined.map_err(CrawlError::from).and_then(|stored| stored),
        }?;

        info!(dispatched, stored, "crawl finished");
        Ok(CrawlReport { dispatched, stored })
    }
}

// Reads the source batch by batch until it is exhausted or something fails
//
// Returns the number of fetch tasks launched. `ctx` holds the last relay
// sender: it is dropped on return, which closes the relay on every path.
// On error the current batch is aborted and awaited first, so no fetch
// task can deliver a result afterwards.
async fn dispatch_batches<R: AsyncRead + Unpin>(
    source: &mut LineSource<R>,
    ctx: FetchContext,
    scope: &CancellationToken,
    failure: &FailureSignal,
    batch_size: usize,
) -> Result<usize, CrawlError> {
    let mut dispatched = 0;
    let mut batch_number = 0;

    loop {
        // A sink failure or a cancellation between batches stops the crawl
        // before any line of the next batch is read
        if scope.is_cancelled() {
            return Err(failure.current());
        }

        batch_number += 1;
        let batch_scope = scope.child_token();
        let mut batch = JoinSet::new();
        let mut exhausted = false;

        for _ in 0..batch_size {
            match source.next_line().await {
                Ok(Some(url)) => {
                    batch.spawn(fetch_url(ctx.clone(), batch_scope.clone(), url));
                }
                Ok(None) => {
                    exhausted = true;
                    break;
                }
                Err(e) => {
                    batch_scope.cancel();
                    batch.shutdown().await;
                    return Err(e.into());
                }
            }
        }

        dispatched += batch.len();
        debug!(batch = batch_number, size = batch.len(), "batch dispatched");

        if let Err(e) = join_batch(&mut batch, &batch_scope).await {
            batch.shutdown().await;
            return Err(e);
        }

        if exhausted {
            return Ok(dispatched);
        }
    }
}

// Waits for every task of a batch, stopping at the first error
//
// On error the batch scope is cancelled; the caller shuts down the tasks
// still running.
async fn join_batch(
    batch: &mut JoinSet<Result<(), CrawlError>>,
    batch_scope: &CancellationToken,
) -> Result<(), CrawlError> {
    while let Some(joined) = batch.join_next().await {
        if let Err(e) = joined.map_err(CrawlError::from).and_then(|outcome| outcome) {
            batch_scope.cancel();
            return Err(e);
        }
    }
    Ok(())
}
