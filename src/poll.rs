//! Background feed polling.
//!
//! Runs on a dedicated thread, fetching the selected category with the
//! current session's [`Client`] and sending results to the UI thread over an
//! [`mpsc`] channel.
//!
//! Each category selection is its own query session with its own client.
//! When the user switches category, the UI thread cancels the old client
//! (aborting a transfer that may still be running here) and sends the new
//! one over as a [`PollCmd::Session`].  A cancelled fetch is reported as
//! [`PollMsg::Cancelled`], never as an error.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use newsfeed::{Client, Fetcher, HttpFetcher, NewsItem};

use crate::category::Category;

/// Messages sent from the poller thread to the UI thread.
#[derive(Debug)]
pub enum PollMsg {
    /// A successful fetch of `category` returned these items.
    Items {
        category: Category,
        items: Vec<NewsItem>,
    },
    /// The fetch was cancelled on purpose.
    Cancelled(Category),
    /// A fetch of `category` failed; `message` describes the error.
    Error { category: Category, message: String },
}

/// Commands sent from the UI thread to the poller.
pub enum PollCmd<F = HttpFetcher> {
    /// Switch to a new query session and fetch it right away.
    Session {
        client: Arc<Client<F>>,
        category: Category,
    },
    /// Re-fetch the current session now.
    Refresh,
}

/// How often the poller re-fetches the current category.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Search text passed along with every fetch.
const ANY_QUERY: &str = "*";

/// Spawn the background polling thread.
///
/// The first fetch starts immediately.  The thread exits once the command
/// sender is dropped or the message receiver goes away.
pub fn spawn<F>(
    client: Arc<Client<F>>,
    category: Category,
    interval: Duration,
) -> (mpsc::Sender<PollCmd<F>>, mpsc::Receiver<PollMsg>)
where
    F: Fetcher + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<PollCmd<F>>();
    let (msg_tx, msg_rx) = mpsc::channel();

    thread::spawn(move || {
        let mut client = client;
        let mut category = category;

        loop {
            // If the receiver is gone the main thread has exited.
            if msg_tx.send(fetch(&client, category)).is_err() {
                return;
            }

            match cmd_rx.recv_timeout(interval) {
                Ok(PollCmd::Session {
                    client: next,
                    category: selected,
                }) => {
                    client = next;
                    category = selected;
                }
                Ok(PollCmd::Refresh) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    });

    (cmd_tx, msg_rx)
}

fn fetch<F: Fetcher>(client: &Client<F>, category: Category) -> PollMsg {
    match client.fetch_items(ANY_QUERY, category.code()) {
        Ok(items) => PollMsg::Items { category, items },
        Err(e) if e.is_cancelled() => PollMsg::Cancelled(category),
        Err(e) => PollMsg::Error {
            category,
            message: format!("{}: {e}", category.label()),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
