use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::helpers::{region_block, to_line};
use crate::theme::Theme;
use crate::view::{TasksView, Tone};

pub fn render_tasks(f: &mut Frame, theme: &Theme, tasks: &TasksView, selected: usize, area: Rect) {
    let block = region_block(&tasks.title, tasks.available, theme);

    if tasks.rows.is_empty() {
        let lines = tasks
            .placeholder
            .iter()
            .map(|line| to_line(line, theme))
            .collect::<Vec<_>>();
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let header = Row::new(
        ["ID", "Status", "Description", "Agent", "Source", "Created (UTC)"]
            .into_iter()
            .map(|h| Cell::from(Span::styled(h, Style::default().fg(theme.label)))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = tasks.rows.iter().map(|row| {
        let status_color = theme.color(Tone::for_status(row.status));
        let text = Style::default().fg(theme.text);
        Row::new(vec![
            Cell::from(Span::styled(row.short_id.as_str(), Style::default().fg(theme.highlight))),
            Cell::from(Span::styled(row.status.label(), Style::default().fg(status_color))),
            Cell::from(Span::styled(row.description.as_str(), text)),
            Cell::from(Span::styled(row.agent.as_str(), text)),
            Cell::from(Span::styled(row.source.as_str(), Style::default().fg(theme.label))),
            Cell::from(Span::styled(row.created.as_str(), Style::default().fg(theme.label))),
        ])
    });

    let widths = [
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(19),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(theme.selection).add_modifier(Modifier::BOLD));
    // The table scrolls so the selected row stays in view.
    let mut state = TableState::default().with_selected(Some(selected));
    f.render_stateful_widget(table, area, &mut state);
}
