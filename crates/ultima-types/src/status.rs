use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a task as reported by the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Pending,
    InProgress,
    Completed,
    Failed,
    #[default]
    Unknown,
}

impl StatusKind {
    /// Every state the backend is known to emit, in display order.
    pub const KNOWN: [StatusKind; 4] = [
        StatusKind::Pending,
        StatusKind::InProgress,
        StatusKind::Completed,
        StatusKind::Failed,
    ];

    /// Total over arbitrary backend strings; anything unrecognised is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "pending" => StatusKind::Pending,
            "in_progress" | "running" => StatusKind::InProgress,
            "completed" | "done" => StatusKind::Completed,
            "failed" | "error" => StatusKind::Failed,
            _ => StatusKind::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusKind::Pending => "pending",
            StatusKind::InProgress => "in_progress",
            StatusKind::Completed => "completed",
            StatusKind::Failed => "failed",
            StatusKind::Unknown => "unknown",
        }
    }
}

impl FromStr for StatusKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(StatusKind::parse(s))
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for StatusKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(raw) => StatusKind::parse(&raw),
            _ => StatusKind::Unknown,
        })
    }
}

/// One poll's view of the orchestrator: run state plus aggregate counters.
///
/// Counter maps keep the backend's raw keys so that statuses this client
/// does not know about still show up in totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "StatusWire")]
pub struct OrchestratorStatus {
    pub running: bool,
    pub pid: Option<u32>,
    pub total_tasks: u64,
    pub status_counts: BTreeMap<String, u64>,
    pub agent_counts: BTreeMap<String, u64>,
    pub type_counts: BTreeMap<String, u64>,
}

impl OrchestratorStatus {
    /// Sum of all counters whose key resolves to `kind`.
    pub fn status_count(&self, kind: StatusKind) -> u64 {
        self.status_counts
            .iter()
            .filter(|(key, _)| StatusKind::parse(key) == kind)
            .map(|(_, count)| *count)
            .sum()
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RunStateWire {
    running: bool,
    pid: Option<u32>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct StatusWire {
    running: Option<bool>,
    pid: Option<u32>,
    #[serde(alias = "totalTasks")]
    total_tasks: Option<u64>,
    #[serde(alias = "statusCounts")]
    status_counts: BTreeMap<String, u64>,
    #[serde(alias = "agentCounts")]
    agent_counts: BTreeMap<String, u64>,
    #[serde(alias = "typeCounts")]
    type_counts: BTreeMap<String, u64>,
    ultima_status: Option<RunStateWire>,
}

impl From<StatusWire> for OrchestratorStatus {
    fn from(wire: StatusWire) -> Self {
        let (running, pid) = match wire.ultima_status {
            Some(state) => (state.running, state.pid),
            None => (wire.running.unwrap_or(false), wire.pid),
        };
        let total_tasks = wire
            .total_tasks
            .unwrap_or_else(|| wire.status_counts.values().sum());

        Self {
            running,
            pid,
            total_tasks,
            status_counts: wire.status_counts,
            agent_counts: wire.agent_counts,
            type_counts: wire.type_counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_nested_backend_shape() {
        let body = json!({
            "total_tasks": 7,
            "status_counts": {"completed": 4, "pending": 2, "weird": 1},
            "agent_counts": {"coder": 5, "pending": 2},
            "type_counts": {"general": 7},
            "ultima_status": {"running": true, "pid": 4242}
        });

        let status: OrchestratorStatus = serde_json::from_value(body).unwrap();
        assert!(status.running);
        assert_eq!(status.pid, Some(4242));
        assert_eq!(status.total_tasks, 7);
        assert_eq!(status.status_count(StatusKind::Completed), 4);
        assert_eq!(status.status_count(StatusKind::Unknown), 1);
        assert_eq!(status.agent_counts.get("coder"), Some(&5));
    }

    #[test]
    fn test_flat_shape_and_derived_total() {
        let body = json!({
            "running": false,
            "pid": null,
            "statusCounts": {"failed": 1, "in_progress": 2}
        });

        let status: OrchestratorStatus = serde_json::from_value(body).unwrap();
        assert!(!status.running);
        assert_eq!(status.pid, None);
        assert_eq!(status.total_tasks, 3);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(serde_json::from_value::<OrchestratorStatus>(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_status_kind_aliases() {
        assert_eq!(StatusKind::parse("In-Progress"), StatusKind::InProgress);
        assert_eq!(StatusKind::parse("COMPLETED"), StatusKind::Completed);
        assert_eq!(StatusKind::parse("queued"), StatusKind::Unknown);
        assert_eq!(StatusKind::Unknown.to_string(), "unknown");

        let kind: StatusKind = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(kind, StatusKind::Unknown);
    }

    proptest! {
        #[test]
        fn prop_parse_is_total_and_stable(raw in ".*") {
            let kind = StatusKind::parse(&raw);
            prop_assert_eq!(StatusKind::parse(kind.label()), kind);
        }
    }
}
