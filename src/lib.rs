//! newsfeed — fetch a category news feed and parse its items.
//!
//! ## Architecture overview
//!
//! ```text
//! caller ──► Client::fetch_items ──► request::build_target
//!                  │
//!                  ├──► Fetcher::fetch (network, polls the cancel flag)
//!                  │
//!                  └──► feed::parser::parse ──► Vec<NewsItem> ──► caller
//! ```
//!
//! * **`config`** — the immutable [`Config`] shared by every client.
//! * **`request`** — pure request target construction.
//! * **`feed`** — the [`Fetcher`] seam, the HTTP implementation, the
//!   [`NewsItem`] type and the streaming parser.
//! * **`client`** — the orchestrator and its cancellation flag.
//! * **`error`** — one error enum per stage plus the combined [`FetchError`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use newsfeed::{Client, Config};
//!
//! let client = Client::new(Arc::new(Config::default()))?;
//! for item in client.fetch_items("*", "45910")? {
//!     println!("{} <{}>", item.title, item.link);
//! }
//! # Ok::<(), newsfeed::FetchError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod request;

pub use client::{CancelHandle, Client};
pub use config::Config;
pub use error::{FetchError, ParseError, RequestError, TransferError};
pub use feed::{Fetcher, HttpFetcher, NewsItem, Next, Progress};
