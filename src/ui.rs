//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! The layout is three rows: the scrollable item list, a detail pane for the
//! selected item, and a one-line status bar.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

/// Height of the detail pane, borders included.
const DETAIL_HEIGHT: u16 = 6;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [list_area, detail_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(DETAIL_HEIGHT),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_item_list(app, frame, list_area);
    draw_detail(app, frame, detail_area);
    draw_status_bar(app, frame, status_area);
}

/// Render the scrollable item list.
fn draw_item_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .items
        .iter()
        .map(|item| {
            let marker = if item.has_image() { "▣" } else { " " };
            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(item.title.as_str(), Style::default().fg(Color::White)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(list_items)
        .block(
            Block::default()
                .title(format!(" {} ", app.category.label()))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render description and link of the selected item.
fn draw_detail(app: &App, frame: &mut Frame, area: Rect) {
    let lines = match app.selected_item() {
        Some(item) => vec![
            Line::from(item.description.as_str()),
            Line::from(Span::styled(
                item.link.as_str(),
                Style::default().fg(Color::Cyan),
            )),
        ],
        None => vec![Line::from(Span::styled(
            "No item selected",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(detail, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let refreshed = app
        .last_refresh
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".into());

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.status.as_str(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(
            format!("{} items", app.items.len()),
            Style::default().fg(Color::Green),
        ),
        Span::raw(format!("  updated {refreshed}")),
        Span::raw("  q: quit  ←/→: category  r: refresh  ↑/↓: scroll"),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::poll::PollMsg;
    use newsfeed::NewsItem;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(100, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    fn loaded_app() -> App {
        let mut app = App::new(Category::World);
        app.apply(PollMsg::Items {
            category: Category::World,
            items: vec![NewsItem {
                title: "Headline one".into(),
                link: "http://x/1".into(),
                description: "Summary text".into(),
                image: "http://x/1.jpg".into(),
            }],
        });
        app
    }

    #[test]
    fn draw_does_not_panic_with_no_items() {
        let mut app = App::new(Category::TopStories);
        let text = render(&mut app);
        assert!(text.contains("No item selected"));
    }

    #[test]
    fn shows_category_title_and_items() {
        let mut app = loaded_app();
        let text = render(&mut app);
        assert!(text.contains("World"));
        assert!(text.contains("Headline one"));
    }

    #[test]
    fn detail_pane_shows_selected_description_and_link() {
        let mut app = loaded_app();
        let text = render(&mut app);
        assert!(text.contains("Summary text"));
        assert!(text.contains("http://x/1"));
    }

    #[test]
    fn status_bar_shows_item_count() {
        let mut app = loaded_app();
        let text = render(&mut app);
        assert!(text.contains("1 items"), "status bar should show item count");
    }
}
