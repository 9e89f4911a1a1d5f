use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::theme::Theme;
use crate::view::{RegionView, ViewLine};

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn to_line<'a>(line: &'a ViewLine, theme: &Theme) -> Line<'a> {
    Line::from(
        line.segments
            .iter()
            .map(|segment| Span::styled(segment.text.as_str(), theme.style(segment)))
            .collect::<Vec<_>>(),
    )
}

/// Border and title turn to the error colour while a region is degraded.
pub fn region_block<'a>(title: &'a str, available: bool, theme: &Theme) -> Block<'a> {
    let (border, title_color) = if available {
        (theme.border, theme.title)
    } else {
        (theme.error, theme.error)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(title, Style::default().fg(title_color)))
}

pub fn region_paragraph<'a>(region: &'a RegionView, theme: &Theme) -> Paragraph<'a> {
    let lines: Vec<Line> = region.lines.iter().map(|line| to_line(line, theme)).collect();
    Paragraph::new(lines)
        .block(region_block(&region.title, region.available, theme))
        .wrap(Wrap { trim: false })
}

pub fn popup_block<'a>(title: &'a str, color: ratatui::style::Color, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            title,
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ))
}

pub fn key_hint<'a>(key: &'a str, label: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::styled(key, Style::default().fg(theme.highlight)),
        Span::styled(label, Style::default().fg(theme.text)),
    ]
}
