//! The shared display surface.
//!
//! Every region is replaced whole by whoever owns it: the refresh loop
//! swaps the four cycle regions, the detail loader owns the overlay, and
//! the control panel owns the notice and the form. Writers hold the lock
//! only for the swap itself.

use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::RwLock;
use ultima_types::{NewTask, TaskPriority, TASK_TYPES};

use crate::view::{CycleRender, DetailView, RegionView, TasksView};

pub type SharedScreen = Arc<RwLock<Screen>>;

const ACTIVITY_CAP: usize = 10;

pub struct Screen {
    pub status_bar: RegionView,
    pub stats: RegionView,
    pub agents: RegionView,
    pub tasks: TasksView,
    /// Highlighted row in `tasks`.
    pub selected: usize,
    pub detail: Option<DetailView>,
    pub notice: Option<Notice>,
    pub form: TaskForm,
    pub activity: Vec<ActivityEntry>,
    pub last_refresh: Option<DateTime<Local>>,
    /// Number of refresh cycles applied so far.
    pub renders: u64,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            status_bar: RegionView::waiting(" Orchestrator "),
            stats: RegionView::waiting(" Task Stats "),
            agents: RegionView::waiting(" Agents "),
            tasks: TasksView::waiting(),
            selected: 0,
            detail: None,
            notice: None,
            form: TaskForm::default(),
            activity: Vec::new(),
            last_refresh: None,
            renders: 0,
        }
    }
}

impl Screen {
    pub fn shared() -> SharedScreen {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn apply_cycle(&mut self, cycle: CycleRender) {
        self.status_bar = cycle.status_bar;
        self.stats = cycle.stats;
        self.agents = cycle.agents;
        self.tasks = cycle.tasks;
        self.selected = self.selected.min(self.tasks.rows.len().saturating_sub(1));
        self.last_refresh = Some(Local::now());
        self.renders += 1;
    }

    pub fn selected_task_id(&self) -> Option<&str> {
        self.tasks.binding(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.tasks.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn show_notice(&mut self, title: &str, message: impl Into<String>) {
        self.notice = Some(Notice {
            title: title.to_string(),
            message: message.into(),
        });
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// A message identical to the newest entry is dropped; the oldest
    /// entry falls off past the cap.
    pub fn add_activity(&mut self, level: ActivityLevel, message: &str) {
        if self.activity.last().is_some_and(|a| a.message == message) {
            return;
        }
        if self.activity.len() >= ACTIVITY_CAP {
            self.activity.remove(0);
        }
        self.activity.push(ActivityEntry {
            time: Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.to_string(),
        });
    }
}

/// Blocking message box; keys other than Esc/Enter are swallowed while it
/// is up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityLevel {
    Info,
    Warn,
    Error,
}

impl ActivityLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Info => "info",
            ActivityLevel::Warn => "warn",
            ActivityLevel::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityEntry {
    pub time: String,
    pub level: ActivityLevel,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Description,
    Type,
    Priority,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Description => FormField::Type,
            FormField::Type => FormField::Priority,
            FormField::Priority => FormField::Description,
        }
    }
}

/// Create-task form. Hiding keeps the contents; only a successful create
/// clears them.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TaskForm {
    pub visible: bool,
    pub description: String,
    pub type_index: usize,
    pub priority: TaskPriority,
    pub focus: FormField,
}

impl TaskForm {
    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn clear(&mut self) {
        *self = Self {
            visible: self.visible,
            ..Self::default()
        };
    }

    pub fn task_type(&self) -> &'static str {
        TASK_TYPES
            .get(self.type_index)
            .copied()
            .unwrap_or(TASK_TYPES[0])
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn push_char(&mut self, c: char) {
        if self.focus == FormField::Description {
            self.description.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.focus == FormField::Description {
            self.description.pop();
        }
    }

    /// Left/Right on the type or priority field.
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            FormField::Description => {}
            FormField::Type => {
                let len = TASK_TYPES.len();
                self.type_index = if forward {
                    (self.type_index + 1) % len
                } else {
                    (self.type_index + len - 1) % len
                };
            }
            FormField::Priority => {
                self.priority = if forward {
                    self.priority.next()
                } else {
                    self.priority.previous()
                };
            }
        }
    }

    pub fn to_new_task(&self) -> NewTask {
        NewTask::new(self.description.trim(), self.task_type(), self.priority)
    }
}
