//! The fetch-and-parse client.
//!
//! A [`Client`] ties the pieces together: it builds the request target from
//! the shared [`Config`], runs the transfer through its [`Fetcher`] while
//! polling a cancellation flag, and hands the body to the item parser.
//!
//! ## Cancellation
//!
//! Each client owns one flag.  [`Client::cancel`] (or a [`CancelHandle`]
//! obtained from [`Client::cancel_handle`]) may be called from any thread at
//! any time.  The flag is read on every progress tick of the transfer, so a
//! cancel that happens before a tick aborts the transfer at that tick.  It
//! is never cleared: once cancelled, every later fetch on the same client is
//! aborted immediately.  Start a new client for a new query session.
//!
//! One client performs at most one fetch at a time; fetches are sequential.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{FetchError, TransferError};
use crate::feed::{parser, Fetcher, HttpFetcher, NewsItem, Next};
use crate::request::build_target;

/// Every feed lives under `{root}/{category}/` with this name.
pub const FEED_RESOURCE: &str = "rss.xml";

/// Query parameters attached to every feed request.
const FEED_QUERY: &[(&str, &str)] = &[("mode", "xml")];

/// Cloneable, thread-safe trigger for cancelling one [`Client`].
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Fetches category feeds.
///
/// Generic over the transport so tests can substitute an in-memory
/// [`Fetcher`]; [`Client::new`] uses [`HttpFetcher`].
#[derive(Debug)]
pub struct Client<F = HttpFetcher> {
    config: Arc<Config>,
    fetcher: F,
    cancelled: CancelHandle,
}

impl Client<HttpFetcher> {
    /// Create a client backed by a fresh [`HttpFetcher`].
    pub fn new(config: Arc<Config>) -> Result<Self, FetchError> {
        Ok(Self::with_fetcher(config, HttpFetcher::new()?))
    }
}

impl<F: Fetcher> Client<F> {
    pub fn with_fetcher(config: Arc<Config>, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            cancelled: CancelHandle(Arc::new(AtomicBool::new(false))),
        }
    }

    /// Fetch and parse the feed for `category`.
    ///
    /// `query` is accepted so callers can pass the user's search text
    /// through, but the feed endpoint has no search facility and it does
    /// not change the request.
    ///
    /// # Errors
    ///
    /// * [`FetchError::Request`] — the configured root is not a usable URL.
    /// * [`FetchError::Transfer`] — aborted by [`cancel`](Client::cancel)
    ///   (see [`FetchError::is_cancelled`]), a non-success status, or a
    ///   network failure.
    /// * [`FetchError::Parse`] — the body was malformed or truncated.
    pub fn fetch_items(&self, query: &str, category: &str) -> Result<Vec<NewsItem>, FetchError> {
        let target = build_target(&self.config, &[category, FEED_RESOURCE], FEED_QUERY)?;
        debug!(url = %target, category, query, "fetching category feed");

        let cancelled = &self.cancelled;
        let body = self
            .fetcher
            .fetch(&target, &self.config.agent, &mut |_progress| {
                if cancelled.is_cancelled() {
                    Next::Abort
                } else {
                    Next::Continue
                }
            })
            .map_err(|err| {
                match &err {
                    TransferError::Aborted => info!(category, "feed fetch cancelled"),
                    other => warn!(category, error = %other, "feed fetch failed"),
                }
                err
            })?;

        let items = parser::parse_bytes(&body).map_err(|err| {
            warn!(category, error = %err, "feed document rejected");
            err
        })?;

        debug!(category, count = items.len(), "parsed feed items");
        Ok(items)
    }

    /// Abort any in-flight fetch and every later one on this client.
    pub fn cancel(&self) {
        self.cancelled.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.is_cancelled()
    }

    /// A handle that cancels this client from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancelled.clone()
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
