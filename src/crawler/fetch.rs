// src/crawler/fetch.rs
// =============================================================================
// One fetch task: GET one URL, turn the response into a CrawlResult and hand
// it to the relay.
//
// How it works:
// 1. Build the request (method + URL). Nothing touches the network if this fails.
// 2. Send it, racing the batch's cancellation token and the sink failure.
// 3. Record the status code (any code, 404 and 500 included) and the time.
// 4. Hand the result off, racing three things:
//    - the consumer reported a failure   -> that same error, result dropped
//    - the scope is cancelled            -> CrawlError::Cancelled, result dropped
//    - the relay accepted the result     -> Ok(())
// =============================================================================

use reqwest::{Client, Method, Request};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use super::relay::FailureSignal;
use super::{CrawlError, CrawlResult};

/// Everything a fetch task shares with its siblings.
#[derive(Debug, Clone)]
pub(crate) struct FetchContext {
    pub(crate) client: Client,
    pub(crate) method: String,
    pub(crate) relay: mpsc::Sender<CrawlResult>,
    pub(crate) failure: FailureSignal,
}

pub(crate) async fn fetch_url(
    ctx: FetchContext,
    scope: CancellationToken,
    url: String,
) -> Result<(), CrawlError> {
    let request = build_request(&ctx.client, &ctx.method, &url)?;

    debug!(url = %url, "calling");

    // Dropping the in-flight request future aborts the connection. A sink
    // failure cancels the scope too, so it is checked first to keep its error.
    let response = tokio::select! {
        biased;
        error = ctx.failure.raised() => return Err(error),
        _ = scope.cancelled() => return Err(CrawlError::Cancelled),
        response = ctx.client.execute(request) => {
            response.map_err(|source| CrawlError::Transport { url: url.clone(), source })?
        }
    };

    let result = CrawlResult::observed_now(url, response.status().as_u16());
    // We never look at the body
    drop(response);

    tokio::select! {
        biased;
        error = ctx.failure.raised() => Err(error),
        _ = scope.cancelled() => Err(CrawlError::Cancelled),
        sent = ctx.relay.send(result) => {
            // A closed relay means the consumer is already gone
            sent.map_err(|_| CrawlError::Cancelled)
        }
    }
}

fn build_request(client: &Client, method: &str, url: &str) -> Result<Request, CrawlError> {
    let method = Method::from_bytes(method.as_bytes()).map_err(|_| CrawlError::InvalidMethod {
        method: method.to_string(),
    })?;

    let target = Url::parse(url).map_err(|source| CrawlError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    client
        .request(method, target)
        .build()
        .map_err(|source| CrawlError::BuildRequest {
            url: url.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_get_request() {
        let client = Client::new();
        let request = build_request(&client, "GET", "https://example.com/a?b=c").unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().as_str(), "https://example.com/a?b=c");
    }

    #[test]
    fn test_invalid_method() {
        let client = Client::new();
        let err = build_request(&client, "@", "https://example.com").unwrap_err();
        assert!(matches!(err, CrawlError::InvalidMethod { method } if method == "@"));
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let client = Client::new();
        let err = build_request(&client, "GET", "pippo.pluto.paperino").unwrap_err();
        assert!(matches!(err, CrawlError::InvalidUrl { url, .. } if url == "pippo.pluto.paperino"));
    }

    #[test]
    fn test_blank_line_is_rejected() {
        let client = Client::new();
        let err = build_request(&client, "GET", "").unwrap_err();
        assert!(matches!(err, CrawlError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_cancelled_before_call() {
        let (relay, _rx) = crate::crawler::relay::channel();
        let scope = CancellationToken::new();
        let ctx = FetchContext {
            client: Client::new(),
            method: "GET".to_string(),
            relay,
            failure: FailureSignal::new(scope.clone()),
        };
        scope.cancel();

        let err = fetch_url(ctx, scope, "http://127.0.0.1:9/".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::Cancelled));
    }
}
