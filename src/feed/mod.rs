//! Feed transfer and parsing.
//!
//! This module defines the [`Fetcher`] trait (the single seam between the
//! [`Client`](crate::Client) and the network), the [`NewsItem`] type, and
//! the streaming item [`parser`].
//!
//! ## For contributors — substituting the transport
//!
//! 1. Implement [`Fetcher`] for your type.  Call `on_progress` at least once
//!    before doing any work and honour [`Next::Abort`] by returning
//!    [`TransferError::Aborted`].
//! 2. Hand it to [`Client::with_fetcher`](crate::Client::with_fetcher).
//!
//! The tests in `client.rs` use an in-memory fetcher built exactly this way.

mod http;
mod news_item;
pub mod parser;

pub use http::HttpFetcher;
pub use news_item::NewsItem;

use url::Url;

use crate::error::TransferError;

/// How far a transfer has got, reported to the progress callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Body bytes received so far.
    pub received: u64,
    /// Expected body length, when the server announced one.
    pub total: Option<u64>,
}

/// What the progress callback wants the transfer to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Continue,
    Abort,
}

/// Performs one blocking retrieval of a request target.
///
/// Implementations must be [`Send`] + [`Sync`] so a client can be shared with
/// the thread that cancels it.
pub trait Fetcher: Send + Sync {
    /// Fetch `target`, identifying as `agent`, and return the raw body.
    ///
    /// `on_progress` is polled at every progress tick; when it returns
    /// [`Next::Abort`] the transfer stops and [`TransferError::Aborted`] is
    /// returned.  A non-success status yields [`TransferError::HttpStatus`].
    fn fetch(
        &self,
        target: &Url,
        agent: &str,
        on_progress: &mut dyn FnMut(Progress) -> Next,
    ) -> Result<Vec<u8>, TransferError>;
}
