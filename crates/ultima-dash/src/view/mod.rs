//! Region descriptions produced by the renderer.
//!
//! Nothing in here knows about terminals: a region is plain data (lines of
//! toned text, or task rows) that the `ui` adapter turns into widgets. Two
//! renders of the same payload compare equal, which is what the screen
//! relies on when it swaps a region wholesale.

mod render;

pub use render::{
    render_agents, render_cycle, render_detail, render_detail_loading, render_stats,
    render_status_bar, render_tasks, render_unavailable, CycleRender,
};

use ultima_types::StatusKind;

/// Semantic colour of a piece of text; the theme decides the actual colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tone {
    Text,
    Label,
    Highlight,
    Success,
    Warning,
    Error,
    Muted,
}

impl Tone {
    /// Visual indicator for a task status. Unknown statuses look pending.
    pub fn for_status(status: StatusKind) -> Self {
        match status {
            StatusKind::Completed => Tone::Success,
            StatusKind::Failed => Tone::Error,
            StatusKind::InProgress => Tone::Highlight,
            StatusKind::Pending | StatusKind::Unknown => Tone::Warning,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub tone: Tone,
    pub bold: bool,
}

impl Segment {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ViewLine {
    pub segments: Vec<Segment>,
}

impl ViewLine {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn plain(text: impl Into<String>, tone: Tone) -> Self {
        Self::new(vec![Segment::new(text, tone)])
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A titled block of lines. `available` is false when the region is
/// showing a degraded placeholder instead of data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionView {
    pub title: String,
    pub lines: Vec<ViewLine>,
    pub available: bool,
}

impl RegionView {
    pub fn new(title: impl Into<String>, lines: Vec<ViewLine>) -> Self {
        Self {
            title: title.into(),
            lines,
            available: true,
        }
    }

    /// Shown before the first refresh lands.
    pub fn waiting(title: impl Into<String>) -> Self {
        Self::new(title, vec![ViewLine::plain("Waiting for first refresh...", Tone::Muted)])
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(ViewLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRow {
    pub task_id: String,
    pub status: StatusKind,
    pub short_id: String,
    pub description: String,
    pub agent: String,
    pub source: String,
    pub created: String,
}

/// The task table. Each row's `task_id` is its activation binding; rows and
/// bindings are replaced together, so an old binding can never outlive the
/// render that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TasksView {
    pub title: String,
    pub rows: Vec<TaskRow>,
    pub placeholder: Option<ViewLine>,
    pub available: bool,
}

impl TasksView {
    pub fn waiting() -> Self {
        Self {
            title: " Recent Tasks ".into(),
            rows: Vec::new(),
            placeholder: Some(ViewLine::plain("Waiting for first refresh...", Tone::Muted)),
            available: true,
        }
    }

    pub fn binding(&self, index: usize) -> Option<&str> {
        self.rows
            .get(index)
            .map(|row| row.task_id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// Task detail overlay: the record half and the log half load and fail
/// independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailView {
    pub task_id: String,
    pub fields: RegionView,
    pub log: RegionView,
    pub loading: bool,
}
