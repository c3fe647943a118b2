//! Application state for the viewer.
//!
//! Holds the items of the selected category in feed order, the list
//! selection, and the status line.  Rendering lives in [`crate::ui`], key
//! handling in [`crate::input`].

use chrono::{DateTime, Local};
use ratatui::widgets::ListState;

use newsfeed::NewsItem;

use crate::category::Category;
use crate::poll::PollMsg;

pub struct App {
    /// Items of [`App::category`], in document order.
    pub items: Vec<NewsItem>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// The category currently shown.
    pub category: Category,
    /// When items were last replaced by a successful fetch.
    pub last_refresh: Option<DateTime<Local>>,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last poll status message.
    pub status: String,
}

impl App {
    pub fn new(category: Category) -> Self {
        Self {
            items: Vec::new(),
            list_state: ListState::default(),
            category,
            last_refresh: None,
            quit: false,
            status: format!("Loading {}…", category.label()),
        }
    }

    /// Fold one poller message into the state.
    ///
    /// Results for a category other than the selected one are stale (the
    /// user has moved on) and are dropped.
    pub fn apply(&mut self, msg: PollMsg) {
        match msg {
            PollMsg::Items { category, items } if category == self.category => {
                let count = items.len();
                self.replace_items(items);
                self.last_refresh = Some(Local::now());
                self.status = format!("Fetched {count} items");
            }
            PollMsg::Error { category, message } if category == self.category => {
                self.status = format!("Error: {message}");
            }
            PollMsg::Items { .. } | PollMsg::Error { .. } | PollMsg::Cancelled(_) => {}
        }
    }

    /// Replace the list, keeping the selection index where possible.
    fn replace_items(&mut self, items: Vec<NewsItem>) {
        self.items = items;
        let selected = match (self.list_state.selected(), self.items.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.list_state.select(selected);
    }

    /// Switch to `category`, clearing the list until its feed arrives.
    pub fn select_category(&mut self, category: Category) {
        self.category = category;
        self.items.clear();
        self.list_state.select(None);
        self.last_refresh = None;
        self.status = format!("Loading {}…", category.label());
    }

    pub fn selected_item(&self) -> Option<&NewsItem> {
        self.list_state.selected().and_then(|i| self.items.get(i))
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.items.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(self.items.len() - 1));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
