#![forbid(unsafe_code)]
#![warn(clippy::all)]

//! Wire types shared by the ULTIMA dashboard and anything else that talks
//! to the orchestrator's REST surface.

mod error;
mod status;
mod task;

pub use error::{CommandError, FetchError, FetchErrorKind, UltimaError, UltimaResult};
pub use status::{OrchestratorStatus, StatusKind};
pub use task::{
    parse_timestamp, CommandResponse, LogPayload, NewTask, TaskDetail, TaskPriority,
    TaskSummary, TASK_TYPES,
};

/// Number of recent tasks the dashboard shows.
pub const DEFAULT_TASK_WINDOW: usize = 10;

/// Poll cadence of the reference dashboard.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 3_000;

/// Wait after a successful command before re-reading backend state.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1_500;

/// Upper bound on any single request.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
