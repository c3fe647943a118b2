//! Error types for the fetch-and-parse pipeline.
//!
//! Each stage has its own error enum; [`FetchError`] folds them together so
//! callers of [`Client::fetch_items`](crate::Client::fetch_items) only match
//! on one type.  Nothing here is retried.

use thiserror::Error;

/// Boxed low-level cause carried by [`TransferError::Network`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The configured root could not be turned into a request target.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid feed root {root:?}: {source}")]
    InvalidRoot {
        root: String,
        #[source]
        source: url::ParseError,
    },

    /// The root parsed, but cannot carry path segments (e.g. `mailto:`).
    #[error("feed root {0:?} cannot be used as a base URL")]
    NotABase(String),
}

/// Failures of a single network transfer.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The progress callback asked for the transfer to stop.
    #[error("transfer aborted")]
    Aborted,

    /// The server answered with a non-2xx status.  `body` is the raw
    /// response text, which need not be XML.
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// DNS, connect, TLS, timeout or body read failure.
    #[error("network error: {0}")]
    Network(#[source] BoxError),
}

impl From<reqwest::Error> for TransferError {
    fn from(err: reqwest::Error) -> Self {
        TransferError::Network(Box::new(err))
    }
}

impl From<std::io::Error> for TransferError {
    fn from(err: std::io::Error) -> Self {
        TransferError::Network(Box::new(err))
    }
}

/// The response body was not a usable feed document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The tokenizer rejected the document.
    #[error("malformed feed: {0}")]
    Malformed(String),

    /// The document ended inside an open `<item>`.
    #[error("feed ended inside an item")]
    Truncated,
}

/// Everything [`Client::fetch_items`](crate::Client::fetch_items) can fail with.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl FetchError {
    /// `true` when the fetch ended because it was cancelled.
    ///
    /// Cancellation is a normal outcome; callers typically suppress error
    /// reporting for it.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Transfer(TransferError::Aborted))
    }
}
