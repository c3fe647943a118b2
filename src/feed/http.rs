//! HTTP transport for feed requests.
//!
//! [`HttpFetcher`] presents a blocking interface but drives an async
//! [`reqwest`] client on its own small tokio runtime.  While waiting on the
//! network it races every await against a [`tokio::time::interval`], so the
//! progress callback keeps ticking even when the server stalls before the
//! headers or in the middle of the body.  An abort therefore takes effect
//! within one [`TICK`] regardless of what the connection is doing.
//!
//! Like `reqwest::blocking`, [`Fetcher::fetch`] must not be called from
//! inside another tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::USER_AGENT;
use tokio::runtime::Runtime;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;
use url::Url;

use super::{Fetcher, Next, Progress};
use crate::error::TransferError;

/// Whole-request timeout (connect + headers + body).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How often the progress callback runs while no data is arriving.
pub const TICK: Duration = Duration::from_millis(100);

/// Upper bound on the up-front body allocation taken from `Content-Length`.
const MAX_PREALLOC: u64 = 1024 * 1024;

/// A [`Fetcher`] that performs real HTTP GET requests.
///
/// Cloning is cheap and shares the runtime and connection pool, so one
/// fetcher can back any number of clients.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
    runtime: Arc<Runtime>,
}

impl HttpFetcher {
    /// Create a fetcher with the default 30 second timeout.
    pub fn new() -> Result<Self, TransferError> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransferError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("newsfeed-http")
            .enable_all()
            .build()?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            runtime: Arc::new(runtime),
        })
    }

    async fn transfer(
        &self,
        target: &Url,
        agent: &str,
        on_progress: &mut dyn FnMut(Progress) -> Next,
    ) -> Result<Vec<u8>, TransferError> {
        let mut progress = Progress::default();

        // First tick happens before any I/O so an early cancel costs nothing.
        if on_progress(progress) == Next::Abort {
            return Err(TransferError::Aborted);
        }

        let mut ticker = interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // An interval fires immediately; that tick was the one above.
        ticker.tick().await;

        debug!(url = %target, "sending feed request");
        let request = self
            .http
            .get(target.clone())
            .header(USER_AGENT, agent)
            .send();
        tokio::pin!(request);

        let mut response = loop {
            tokio::select! {
                result = &mut request => break result?,
                _ = ticker.tick() => {
                    if on_progress(progress) == Next::Abort {
                        return Err(TransferError::Aborted);
                    }
                }
            }
        };

        let status = response.status();
        progress.total = response.content_length();
        debug!(status = status.as_u16(), total = ?progress.total, "response headers received");

        if on_progress(progress) == Next::Abort {
            return Err(TransferError::Aborted);
        }

        let capacity = progress.total.unwrap_or(0).min(MAX_PREALLOC) as usize;
        let mut body = Vec::with_capacity(capacity);
        loop {
            tokio::select! {
                chunk = response.chunk() => match chunk? {
                    Some(bytes) => {
                        body.extend_from_slice(&bytes);
                        progress.received += bytes.len() as u64;
                    }
                    None => break,
                },
                _ = ticker.tick() => {}
            }
            if on_progress(progress) == Next::Abort {
                return Err(TransferError::Aborted);
            }
        }

        if !status.is_success() {
            return Err(TransferError::HttpStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        debug!(bytes = body.len(), "feed body received");
        Ok(body)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(
        &self,
        target: &Url,
        agent: &str,
        on_progress: &mut dyn FnMut(Progress) -> Next,
    ) -> Result<Vec<u8>, TransferError> {
        self.runtime
            .block_on(self.transfer(target, agent, on_progress))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
