use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use super::helpers::{centered_rect, popup_block};
use crate::theme::Theme;

const KEYS: &[(&str, &[(&str, &str)])] = &[
    (
        "Orchestrator",
        &[
            ("  s        ", "Start ULTIMA"),
            ("  x        ", "Stop ULTIMA"),
            ("  r        ", "Refresh now"),
        ],
    ),
    (
        "Tasks",
        &[
            ("  n        ", "New task"),
            ("  Up/Down  ", "Select task"),
            ("  Enter    ", "Show task detail and log"),
            ("  Esc      ", "Close overlay or notice"),
        ],
    ),
    (
        "New task form",
        &[
            ("  Tab      ", "Next field"),
            ("  Left/Right ", "Change type or priority"),
            ("  Enter    ", "Submit"),
            ("  Esc      ", "Hide (keeps what you typed)"),
        ],
    ),
    (
        "General",
        &[("  ?        ", "Toggle help"), ("  q        ", "Quit")],
    ),
];

pub fn render_help(f: &mut Frame, theme: &Theme, area: Rect) {
    let popup_area = centered_rect(50, 70, area);

    let mut lines = Vec::new();
    for (section, keys) in KEYS {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            *section,
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        )));
        for (key, label) in keys.iter() {
            lines.push(Line::from(vec![
                Span::styled(*key, Style::default().fg(theme.highlight)),
                Span::styled(*label, Style::default().fg(theme.text)),
            ]));
        }
    }

    f.render_widget(Clear, popup_area);
    f.render_widget(
        Paragraph::new(lines)
            .block(popup_block(" Help ", theme.highlight, theme))
            .wrap(Wrap { trim: false }),
        popup_area,
    );
}
