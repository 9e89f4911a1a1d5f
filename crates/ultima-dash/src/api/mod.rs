mod commands;
mod detail;
mod status;
mod transport;

#[cfg(test)]
pub(crate) mod fake;
#[cfg(test)]
mod tests;

pub use commands::CommandClient;
pub use detail::TaskDetailClient;
pub use status::{StatusClient, TaskListClient};
pub use transport::HttpTransport;

use async_trait::async_trait;
use std::time::Duration;
use ultima_types::{
    CommandError, FetchError, LogPayload, NewTask, OrchestratorStatus, TaskDetail, TaskSummary,
};

/// Everything the dashboard needs from the orchestrator backend.
///
/// The refresh loop, the control panel and the detail overlay only ever
/// see this trait, which keeps them testable without a live server.
#[async_trait]
pub trait OrchestratorApi: Send + Sync {
    async fn fetch_status(&self) -> Result<OrchestratorStatus, FetchError>;

    async fn fetch_tasks(&self) -> Result<Vec<TaskSummary>, FetchError>;

    async fn fetch_detail(&self, id: &str) -> Result<TaskDetail, FetchError>;

    async fn fetch_log(&self, id: &str) -> Result<LogPayload, FetchError>;

    async fn start_orchestrator(&self) -> Result<Option<String>, CommandError>;

    async fn stop_orchestrator(&self) -> Result<Option<String>, CommandError>;

    async fn create_task(&self, task: &NewTask) -> Result<Option<String>, CommandError>;
}

/// [`OrchestratorApi`] over the backend's REST surface.
pub struct HttpBackend {
    status: StatusClient,
    tasks: TaskListClient,
    detail: TaskDetailClient,
    commands: CommandClient,
}

impl HttpBackend {
    pub fn new(api_url: &str, request_timeout: Duration) -> Result<Self, FetchError> {
        let transport = HttpTransport::new(api_url, request_timeout)?;
        Ok(Self {
            status: StatusClient::new(transport.clone()),
            tasks: TaskListClient::new(transport.clone()),
            detail: TaskDetailClient::new(transport.clone()),
            commands: CommandClient::new(transport),
        })
    }
}

#[async_trait]
impl OrchestratorApi for HttpBackend {
    async fn fetch_status(&self) -> Result<OrchestratorStatus, FetchError> {
        self.status.fetch().await
    }

    async fn fetch_tasks(&self) -> Result<Vec<TaskSummary>, FetchError> {
        self.tasks.fetch().await
    }

    async fn fetch_detail(&self, id: &str) -> Result<TaskDetail, FetchError> {
        self.detail.fetch_detail(id).await
    }

    async fn fetch_log(&self, id: &str) -> Result<LogPayload, FetchError> {
        self.detail.fetch_log(id).await
    }

    async fn start_orchestrator(&self) -> Result<Option<String>, CommandError> {
        self.commands.start().await
    }

    async fn stop_orchestrator(&self) -> Result<Option<String>, CommandError> {
        self.commands.stop().await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Option<String>, CommandError> {
        self.commands.create_task(task).await
    }
}
