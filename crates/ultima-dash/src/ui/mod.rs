mod help;
mod helpers;
mod overlays;
mod tasks;

pub use help::render_help;
pub use overlays::{render_detail, render_form, render_notice};
pub use tasks::render_tasks;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::screen::{ActivityLevel, Screen};
use crate::theme::Theme;
use helpers::{key_hint, region_paragraph};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything the draw pass needs besides the screen itself.
pub struct Chrome<'a> {
    pub theme: &'a Theme,
    pub api_url: &'a str,
    pub show_help: bool,
}

pub fn render_ui(f: &mut Frame, chrome: &Chrome, screen: &Screen) {
    let theme = chrome.theme;
    let size = f.area();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            " ULTIMA Dashboard ",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);
    let inner = block.inner(size);
    f.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(inner);

    f.render_widget(region_paragraph(&screen.status_bar, theme), chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    render_tasks(f, theme, &screen.tasks, screen.selected, body[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(25),
            Constraint::Min(4),
        ])
        .split(body[1]);

    f.render_widget(region_paragraph(&screen.stats, theme), side[0]);
    f.render_widget(region_paragraph(&screen.agents, theme), side[1]);
    render_activity(f, theme, screen, side[2]);

    render_key_bar(f, chrome, screen, chunks[2]);

    if let Some(detail) = &screen.detail {
        render_detail(f, theme, detail, size);
    }
    if screen.form.visible {
        render_form(f, theme, &screen.form, size);
    }
    if chrome.show_help {
        render_help(f, theme, size);
    }
    if let Some(notice) = &screen.notice {
        render_notice(f, theme, notice, size);
    }
}

fn render_activity(f: &mut Frame, theme: &Theme, screen: &Screen, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" Recent Activity ", Style::default().fg(theme.title)));

    let items: Vec<ListItem> = screen
        .activity
        .iter()
        .rev()
        .map(|a| {
            let style = match a.level {
                ActivityLevel::Info => Style::default().fg(theme.text),
                ActivityLevel::Warn => Style::default().fg(theme.warning),
                ActivityLevel::Error => Style::default().fg(theme.error),
            };
            ListItem::new(Line::from(vec![
                Span::styled(a.time.as_str(), Style::default().fg(theme.label)),
                Span::raw(" "),
                Span::styled(a.message.as_str(), style),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_key_bar(f: &mut Frame, chrome: &Chrome, screen: &Screen, area: Rect) {
    let theme = chrome.theme;
    let refreshed = screen
        .last_refresh
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let mut spans = [
        key_hint(" [Q]", " Quit ", theme),
        key_hint("[S]", " Start ", theme),
        key_hint("[X]", " Stop ", theme),
        key_hint("[R]", " Refresh ", theme),
        key_hint("[N]", " New task ", theme),
        key_hint("[?]", " Help ", theme),
    ]
    .concat();
    spans.extend([
        Span::raw(" | "),
        Span::styled(format!("v{}", VERSION), Style::default().fg(theme.label)),
        Span::raw(" | "),
        Span::styled(chrome.api_url, Style::default().fg(theme.label)),
        Span::raw(" | "),
        Span::styled(format!("Updated {}", refreshed), Style::default().fg(theme.label)),
    ]);

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
