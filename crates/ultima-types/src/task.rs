use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::CommandError;
use crate::status::StatusKind;

/// Suggested task types, cycled through by the create form.
pub const TASK_TYPES: &[&str] = &[
    "general",
    "web_development",
    "api_development",
    "data_analysis",
    "file_operation",
    "system_check",
];

/// Row of the recent-task list.
///
/// Task records come from files written by several producers, so the wire
/// form is loose: ids may be numbers, the creation time may live under
/// `created_at` or `timestamp` and may be an ISO string or epoch seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub id: String,
    pub description: String,
    pub status: StatusKind,
    pub agent: String,
    pub source: String,
    pub task_type: Option<String>,
    pub priority: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl<'de> Deserialize<'de> for TaskSummary {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Map::deserialize(deserializer)?;
        Ok(TaskSummary::from_record(&record))
    }
}

impl TaskSummary {
    fn from_record(record: &Map<String, Value>) -> Self {
        Self {
            id: text_field(record, &["id"]).unwrap_or_default(),
            description: text_field(record, &["description"]).unwrap_or_default(),
            status: status_field(record),
            agent: text_field(record, &["agent"]).unwrap_or_else(|| "unknown".to_string()),
            source: text_field(record, &["source"]).unwrap_or_default(),
            task_type: text_field(record, &["task_type", "type"]),
            priority: text_field(record, &["priority"]),
            created_at: ["created_at", "createdAt", "timestamp"]
                .iter()
                .find_map(|key| record.get(*key).and_then(parse_timestamp)),
        }
    }
}

/// Full record of one task; everything beyond the four headline fields is
/// kept verbatim in `metadata`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskDetail {
    pub id: String,
    pub status: StatusKind,
    pub agent: String,
    pub description: String,
    pub metadata: BTreeMap<String, Value>,
}

const DETAIL_HEADLINE_KEYS: [&str; 4] = ["id", "status", "agent", "description"];

impl<'de> Deserialize<'de> for TaskDetail {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Map::deserialize(deserializer)?;
        let metadata = record
            .iter()
            .filter(|(key, _)| !DETAIL_HEADLINE_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(TaskDetail {
            id: text_field(&record, &["id"]).unwrap_or_default(),
            status: status_field(&record),
            agent: text_field(&record, &["agent"]).unwrap_or_else(|| "unknown".to_string()),
            description: text_field(&record, &["description"]).unwrap_or_default(),
            metadata,
        })
    }
}

/// Tail of the log associated with a task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LogPayload {
    #[serde(default)]
    pub log: Vec<String>,
}

impl LogPayload {
    pub fn is_empty(&self) -> bool {
        self.log.iter().all(|line| line.trim().is_empty())
    }

    /// All lines concatenated; lines already carry their own terminators
    /// when the backend read them with `readlines`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for line in &self.log {
            out.push_str(line);
            if !line.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }

    pub fn display_lines(&self) -> impl Iterator<Item = &str> {
        self.log
            .iter()
            .flat_map(|chunk| chunk.split('\n'))
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn next(self) -> Self {
        match self {
            TaskPriority::Low => TaskPriority::Medium,
            TaskPriority::Medium => TaskPriority::High,
            TaskPriority::High => TaskPriority::Low,
        }
    }

    pub fn previous(self) -> Self {
        self.next().next()
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::High => write!(f, "high"),
        }
    }
}

/// Body of `POST /api/tasks/create`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub priority: TaskPriority,
}

impl NewTask {
    pub fn new(
        description: impl Into<String>,
        task_type: impl Into<String>,
        priority: TaskPriority,
    ) -> Self {
        Self {
            description: description.into(),
            task_type: task_type.into(),
            priority,
        }
    }

    pub fn validate(&self) -> Result<(), CommandError> {
        if self.description.trim().is_empty() {
            return Err(CommandError::InvalidInput(
                "Please enter a task description".into(),
            ));
        }
        if self.task_type.trim().is_empty() {
            return Err(CommandError::InvalidInput("Task type cannot be empty".into()));
        }
        Ok(())
    }
}

/// Reply to any mutating call.
///
/// The create endpoint answers with the stored task record rather than a
/// `success` flag, so a missing flag counts as success unless an `error`
/// is present.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct CommandResponse {
    pub success: Option<bool>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn succeeded(&self) -> bool {
        self.success.unwrap_or(self.error.is_none())
    }

    pub fn into_result(self) -> Result<Option<String>, CommandError> {
        if self.succeeded() {
            Ok(self.message)
        } else {
            Err(CommandError::Rejected(
                self.error
                    .unwrap_or_else(|| "command rejected by backend".to_string()),
            ))
        }
    }
}

/// Accepts RFC 3339, naive ISO-8601 (taken as UTC) and epoch seconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(number) => {
            let secs = number.as_f64()?;
            if !secs.is_finite() || secs < 0.0 {
                return None;
            }
            let nanos = (secs.fract() * 1_000_000_000.0) as u32;
            DateTime::from_timestamp(secs.trunc() as i64, nanos)
        }
        Value::String(raw) => {
            let raw = raw.trim();
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
                        .ok()
                        .map(|naive| naive.and_utc())
                })
        }
        _ => None,
    }
}

fn text_field(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn status_field(record: &Map<String, Value>) -> StatusKind {
    match record.get("status") {
        Some(Value::String(raw)) => StatusKind::parse(raw),
        _ => StatusKind::Unknown,
    }
}
