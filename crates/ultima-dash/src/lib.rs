//! ULTIMA operator dashboard.
//!
//! Polls the orchestrator backend for run state and recent tasks, renders
//! them into screen regions, and sends start, stop and create-task
//! commands. The binary in `main.rs` wires these into a terminal UI.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod api;
pub mod app;
pub mod config;
pub mod control;
pub mod detail;
pub mod logging;
pub mod scheduler;
pub mod screen;
pub mod theme;
pub mod ui;
pub mod view;

pub use api::{HttpBackend, OrchestratorApi};
pub use config::DashConfig;
pub use control::{CommandAction, CommandState, ControlPanel};
pub use detail::DetailLoader;
pub use scheduler::{RefreshScheduler, SchedulerConfig, SchedulerHandle};
pub use screen::{Screen, SharedScreen};
