//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] mutations.  Keys that need the poller
//! (refresh, switching category) are returned as an [`Action`] for the main
//! loop to carry out, since only it owns the command channel and the current
//! session's cancel handle.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;
use crate::category::Category;

/// Work the main loop must do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Refresh,
    /// Start a new session for this category.
    SwitchCategory(Category),
}

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('r') => return Action::Refresh,
        KeyCode::Right | KeyCode::Char('l') => {
            let next = app.category.next();
            app.select_category(next);
            return Action::SwitchCategory(next);
        }
        KeyCode::Left | KeyCode::Char('h') => {
            let previous = app.category.previous();
            app.select_category(previous);
            return Action::SwitchCategory(previous);
        }
        _ => {}
    }

    Action::None
}
