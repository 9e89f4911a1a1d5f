use ultima_types::{FetchError, LogPayload, OrchestratorStatus, StatusKind, TaskDetail, TaskSummary};

use super::{DetailView, RegionView, Segment, TaskRow, TasksView, Tone, ViewLine};

const STATUS_TITLE: &str = " Orchestrator ";
const STATS_TITLE: &str = " Task Stats ";
const AGENTS_TITLE: &str = " Agents ";
const DETAIL_TITLE: &str = " Task ";
const LOG_TITLE: &str = " Log ";

/// The four regions one refresh cycle replaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleRender {
    pub status_bar: RegionView,
    pub stats: RegionView,
    pub agents: RegionView,
    pub tasks: TasksView,
}

pub fn render_cycle(
    status: &Result<OrchestratorStatus, FetchError>,
    tasks: &Result<Vec<TaskSummary>, FetchError>,
    window: usize,
) -> CycleRender {
    let status = status.as_ref();
    CycleRender {
        status_bar: render_status_bar(status),
        stats: render_stats(status),
        agents: render_agents(status),
        tasks: render_tasks(tasks.as_ref().map(Vec::as_slice), window),
    }
}

pub fn render_unavailable(title: &str, err: &FetchError) -> RegionView {
    RegionView {
        title: title.to_string(),
        lines: vec![
            ViewLine::plain("Unavailable", Tone::Error),
            ViewLine::plain(err.placeholder(), Tone::Muted),
        ],
        available: false,
    }
}

pub fn render_status_bar(status: Result<&OrchestratorStatus, &FetchError>) -> RegionView {
    let status = match status {
        Ok(status) => status,
        Err(err) => {
            return RegionView {
                title: STATUS_TITLE.to_string(),
                lines: vec![ViewLine::new(vec![
                    Segment::new("Status: ", Tone::Label),
                    Segment::new("UNAVAILABLE", Tone::Error).bold(),
                    Segment::new(format!("  {}", err.placeholder()), Tone::Muted),
                ])],
                available: false,
            }
        }
    };

    let (state, tone) = if status.running {
        ("RUNNING", Tone::Success)
    } else {
        ("STOPPED", Tone::Error)
    };
    let pid = status
        .pid
        .map(|pid| pid.to_string())
        .unwrap_or_else(|| "-".to_string());

    RegionView::new(
        STATUS_TITLE,
        vec![ViewLine::new(vec![
            Segment::new("Status: ", Tone::Label),
            Segment::new(state, tone).bold(),
            Segment::new(" | PID: ", Tone::Label),
            Segment::new(pid, Tone::Text),
            Segment::new(" | Tasks: ", Tone::Label),
            Segment::new(status.total_tasks.to_string(), Tone::Highlight),
        ])],
    )
}

pub fn render_stats(status: Result<&OrchestratorStatus, &FetchError>) -> RegionView {
    let status = match status {
        Ok(status) => status,
        Err(err) => return render_unavailable(STATS_TITLE, err),
    };

    let mut lines: Vec<ViewLine> = StatusKind::KNOWN
        .iter()
        .map(|kind| count_line(kind.label(), status.status_count(*kind), Tone::for_status(*kind)))
        .collect();

    let unknown = status.status_count(StatusKind::Unknown);
    if unknown > 0 {
        lines.push(count_line("unknown", unknown, Tone::Muted));
    }
    lines.push(ViewLine::new(vec![
        Segment::new(format!("{:<14}", "total"), Tone::Label),
        Segment::new(status.total_tasks.to_string(), Tone::Highlight).bold(),
    ]));

    if !status.type_counts.is_empty() {
        lines.push(ViewLine::default());
        lines.push(ViewLine::plain("By type", Tone::Label));
        for (task_type, count) in by_count(&status.type_counts) {
            lines.push(count_line(task_type, count, Tone::Text));
        }
    }

    RegionView::new(STATS_TITLE, lines)
}

pub fn render_agents(status: Result<&OrchestratorStatus, &FetchError>) -> RegionView {
    let status = match status {
        Ok(status) => status,
        Err(err) => return render_unavailable(AGENTS_TITLE, err),
    };

    if status.agent_counts.is_empty() {
        return RegionView::new(
            AGENTS_TITLE,
            vec![ViewLine::plain("No agent activity yet", Tone::Muted)],
        );
    }

    let lines = by_count(&status.agent_counts)
        .into_iter()
        .map(|(agent, count)| count_line(agent, count, Tone::Highlight))
        .collect();
    RegionView::new(AGENTS_TITLE, lines)
}

/// Keeps the server's ordering and cuts it to `window` rows.
pub fn render_tasks(tasks: Result<&[TaskSummary], &FetchError>, window: usize) -> TasksView {
    let tasks = match tasks {
        Ok(tasks) => tasks,
        Err(err) => {
            return TasksView {
                title: " Recent Tasks ".to_string(),
                rows: Vec::new(),
                placeholder: Some(ViewLine::plain(
                    format!("Tasks unavailable: {}", err.placeholder()),
                    Tone::Error,
                )),
                available: false,
            }
        }
    };

    let rows: Vec<TaskRow> = tasks.iter().take(window).map(task_row).collect();
    let placeholder = rows
        .is_empty()
        .then(|| ViewLine::plain("No tasks yet", Tone::Muted));

    TasksView {
        title: format!(" Recent Tasks ({} of {}) ", rows.len(), tasks.len()),
        rows,
        placeholder,
        available: true,
    }
}

pub fn render_detail_loading(task_id: &str) -> DetailView {
    DetailView {
        task_id: task_id.to_string(),
        fields: RegionView::new(DETAIL_TITLE, vec![ViewLine::plain("Loading...", Tone::Muted)]),
        log: RegionView::new(LOG_TITLE, vec![ViewLine::plain("Loading...", Tone::Muted)]),
        loading: true,
    }
}

/// Either half may have failed; the other still renders.
pub fn render_detail(
    task_id: &str,
    detail: Result<&TaskDetail, &FetchError>,
    log: Result<&LogPayload, &FetchError>,
) -> DetailView {
    let fields = match detail {
        Ok(detail) => detail_fields(detail),
        Err(err) => failed_half(DETAIL_TITLE, "Details", err),
    };

    let log = match log {
        Ok(payload) if payload.is_empty() => {
            RegionView::new(LOG_TITLE, vec![ViewLine::plain("No log output", Tone::Muted)])
        }
        Ok(payload) => RegionView::new(
            LOG_TITLE,
            payload
                .display_lines()
                .map(|line| ViewLine::plain(line, Tone::Text))
                .collect(),
        ),
        Err(err) => failed_half(LOG_TITLE, "Log", err),
    };

    DetailView {
        task_id: task_id.to_string(),
        fields,
        log,
        loading: false,
    }
}

fn failed_half(title: &str, what: &str, err: &FetchError) -> RegionView {
    let message = match err {
        FetchError::NotFound(_) => "Task no longer available".to_string(),
        _ => format!("{} unavailable: {}", what, err.placeholder()),
    };
    RegionView {
        title: title.to_string(),
        lines: vec![ViewLine::plain(message, Tone::Error)],
        available: false,
    }
}

fn detail_fields(detail: &TaskDetail) -> RegionView {
    let mut lines = vec![
        field_line("ID", &detail.id, Tone::Highlight),
        field_line("Status", detail.status.label(), Tone::for_status(detail.status)),
        field_line("Agent", &detail.agent, Tone::Text),
        field_line("Description", &detail.description, Tone::Text),
    ];

    for (key, value) in &detail.metadata {
        let rendered = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        lines.push(field_line(key, &rendered, Tone::Muted));
    }

    RegionView::new(DETAIL_TITLE, lines)
}

fn task_row(task: &TaskSummary) -> TaskRow {
    TaskRow {
        task_id: task.id.clone(),
        status: task.status,
        short_id: task.id.chars().take(8).collect(),
        description: task.description.clone(),
        agent: task.agent.clone(),
        source: task.source.clone(),
        created: task
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string()),
    }
}

fn field_line(label: &str, value: &str, tone: Tone) -> ViewLine {
    ViewLine::new(vec![
        Segment::new(format!("{}: ", label), Tone::Label),
        Segment::new(value, tone),
    ])
}

fn count_line(label: &str, count: u64, tone: Tone) -> ViewLine {
    ViewLine::new(vec![
        Segment::new(format!("{:<14}", label), tone),
        Segment::new(count.to_string(), Tone::Text),
    ])
}

/// Highest count first, ties by name, so output does not depend on map order.
fn by_count(counts: &std::collections::BTreeMap<String, u64>) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}
