use ultima_types::{FetchError, OrchestratorStatus, TaskSummary};

use super::transport::HttpTransport;

const STATUS_PATH: &[&str] = &["api", "status"];
const TASKS_PATH: &[&str] = &["api", "tasks"];

/// Reads run state and aggregate counters from `GET /api/status`.
pub struct StatusClient {
    transport: HttpTransport,
}

impl StatusClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub async fn fetch(&self) -> Result<OrchestratorStatus, FetchError> {
        self.transport.get_json(STATUS_PATH).await
    }
}

/// Reads the recent task collection from `GET /api/tasks`.
///
/// The list comes back in server order and untruncated; windowing is a
/// display concern.
pub struct TaskListClient {
    transport: HttpTransport,
}

impl TaskListClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub async fn fetch(&self) -> Result<Vec<TaskSummary>, FetchError> {
        self.transport.get_json(TASKS_PATH).await
    }
}
