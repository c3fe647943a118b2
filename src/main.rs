//! newsfeed — browse a category news feed in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  PollMsg   ┌──────────┐  draw()  ┌──────────┐
//! │  poll.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (thread) │ ◄───────── │ (state)  │          │ (render) │
//! └──────────┘  PollCmd   └──────────┘          └──────────┘
//!      │                       ▲
//!      ▼                       │ handle_key_event()
//! newsfeed::Client        ┌──────────┐
//!                         │ input.rs │
//!                         └──────────┘
//! ```
//!
//! * **`category`** — the section → feed code table.
//! * **`poll`** — background thread that runs the fetches.
//! * **`app`** — owns the viewer state (items, selection, status).
//! * **`ui`** — pure rendering of `App`.
//! * **`input`** — maps key events to `App` mutations and poller actions.
//! * **`main`** — parses arguments, builds the config, runs the event loop,
//!   and cancels the live session on exit.

mod app;
mod category;
mod input;
mod poll;
mod ui;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use newsfeed::{Client, Config, HttpFetcher};

use app::App;
use category::Category;
use input::Action;
use poll::PollCmd;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(version, about = "Browse a category news feed in the terminal")]
struct Args {
    /// Category to open: an index (0 = Top Stories … 7 = The Drum) or a feed code.
    #[arg(short, long, default_value = "0", value_parser = parse_category)]
    category: Category,

    /// TOML file with `root` and/or `agent` keys.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Feed root URL (overrides the config file).
    #[arg(long)]
    root: Option<String>,

    /// User-Agent header value (overrides the config file).
    #[arg(long)]
    agent: Option<String>,

    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch once, print the items, and exit without starting the UI.
    #[arg(long)]
    once: bool,
}

fn parse_category(value: &str) -> Result<Category, String> {
    Category::parse(value).ok_or_else(|| format!("unknown category {value:?}"))
}

impl Args {
    fn build_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(agent) = &self.agent {
            config.agent = agent.clone();
        }
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Send tracing output to `path`.  The terminal belongs to the UI, so
/// without a log file nothing is logged at all.
fn init_file_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newsfeed=debug")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Enters raw mode + alternate screen on construction and restores the
/// terminal on [`Drop`], including during unwinding.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Arc::new(args.build_config()?);

    if args.once {
        match &args.log_file {
            Some(path) => init_file_logging(path)?,
            None => init_stderr_logging(),
        }
        return print_once(config, args.category);
    }

    if let Some(path) = &args.log_file {
        init_file_logging(path)?;
    }
    run_viewer(config, args.category)
}

/// `--once`: one fetch, items to stdout.
fn print_once(config: Arc<Config>, category: Category) -> Result<()> {
    let client = Client::new(config)?;
    let items = client
        .fetch_items("*", category.code())
        .with_context(|| format!("fetching {}", category.label()))?;

    for item in items {
        println!("{}", item.title);
        println!("  {}", item.link);
        if !item.description.is_empty() {
            println!("  {}", item.description);
        }
        if item.has_image() {
            println!("  image: {}", item.image);
        }
    }
    Ok(())
}

fn run_viewer(config: Arc<Config>, category: Category) -> Result<()> {
    install_panic_hook();

    // One fetcher (and connection pool) shared by every session's client.
    let fetcher = HttpFetcher::new()?;
    let new_session = |category: Category| {
        info!(category = category.label(), "starting query session");
        Arc::new(Client::with_fetcher(Arc::clone(&config), fetcher.clone()))
    };

    let mut session = new_session(category);
    let (cmd_tx, rx) = poll::spawn(Arc::clone(&session), category, poll::POLL_INTERVAL);

    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(category);

    // ~10 fps.  Each iteration drains poller messages, renders, then waits
    // up to one tick for a key press.
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = rx.try_recv() {
            app.apply(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                match input::handle_key_event(&mut app, key) {
                    Action::None => {}
                    Action::Refresh => {
                        let _ = cmd_tx.send(PollCmd::Refresh);
                    }
                    Action::SwitchCategory(next) => {
                        // Abort whatever the old session is still downloading.
                        session.cancel();
                        session = new_session(next);
                        let _ = cmd_tx.send(PollCmd::Session {
                            client: Arc::clone(&session),
                            category: next,
                        });
                    }
                }
            }
        }

        if app.quit {
            break;
        }
    }

    // Abort an in-flight transfer; dropping the sender then stops the poller.
    session.cancel();
    drop(cmd_tx);
    Ok(())
}
