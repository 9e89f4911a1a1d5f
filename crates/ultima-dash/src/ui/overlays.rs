use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use super::helpers::{centered_rect, key_hint, popup_block, region_block, region_paragraph, to_line};
use crate::screen::{FormField, Notice, TaskForm};
use crate::theme::Theme;
use crate::view::{DetailView, RegionView};

pub fn render_detail(f: &mut Frame, theme: &Theme, detail: &DetailView, area: Rect) {
    let popup_area = centered_rect(80, 80, area);
    f.render_widget(Clear, popup_area);

    let title = format!(" Task {} ", detail.task_id);
    let outer = popup_block(&title, theme.highlight, theme);
    let inner = outer.inner(popup_area);
    f.render_widget(outer, popup_area);

    let field_height = (detail.fields.lines.len() as u16 + 2).min(inner.height / 2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(field_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    f.render_widget(region_paragraph(&detail.fields, theme), chunks[0]);
    f.render_widget(log_tail(&detail.log, theme, chunks[1]), chunks[1]);
    f.render_widget(
        Paragraph::new(Line::from(key_hint("[Esc]", " Close", theme))),
        chunks[2],
    );
}

/// The log arrives oldest first; keep the newest lines in view. Lines are
/// not wrapped so one log line is one row.
fn log_tail<'a>(log: &'a RegionView, theme: &Theme, area: Rect) -> Paragraph<'a> {
    let rows = area.height.saturating_sub(2) as usize;
    let skip = log.lines.len().saturating_sub(rows);
    let lines: Vec<Line> = log.lines[skip..].iter().map(|line| to_line(line, theme)).collect();
    Paragraph::new(lines).block(region_block(&log.title, log.available, theme))
}

pub fn render_form(f: &mut Frame, theme: &Theme, form: &TaskForm, area: Rect) {
    let popup_area = centered_rect(60, 40, area);

    let marker = |field: FormField| {
        if form.focus == field {
            Span::styled("> ", Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD))
        } else {
            Span::raw("  ")
        }
    };
    let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.label));
    let value = Style::default().fg(theme.text);

    let lines = vec![
        Line::from(vec![
            marker(FormField::Description),
            label("Description: "),
            Span::styled(form.description.as_str(), value),
            Span::styled(
                if form.focus == FormField::Description { "_" } else { "" },
                Style::default().fg(theme.highlight),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            marker(FormField::Type),
            label("Type:        "),
            Span::styled(format!("< {} >", form.task_type()), value),
        ]),
        Line::from(""),
        Line::from(vec![
            marker(FormField::Priority),
            label("Priority:    "),
            Span::styled(format!("< {} >", form.priority), value),
        ]),
        Line::from(""),
        Line::from(
            [
                key_hint("[Tab]", " Next field  ", theme),
                key_hint("[Enter]", " Submit  ", theme),
                key_hint("[Esc]", " Hide", theme),
            ]
            .concat(),
        ),
    ];

    f.render_widget(Clear, popup_area);
    f.render_widget(
        Paragraph::new(lines)
            .block(popup_block(" New Task ", theme.highlight, theme))
            .wrap(Wrap { trim: false }),
        popup_area,
    );
}

pub fn render_notice(f: &mut Frame, theme: &Theme, notice: &Notice, area: Rect) {
    let popup_area = centered_rect(50, 30, area);
    let title = format!(" {} ", notice.title);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            notice.message.as_str(),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(key_hint("[Enter]", " OK", theme)),
    ];

    f.render_widget(Clear, popup_area);
    f.render_widget(
        Paragraph::new(lines)
            .block(popup_block(&title, theme.error, theme))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}
