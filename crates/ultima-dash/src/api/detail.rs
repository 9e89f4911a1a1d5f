use ultima_types::{FetchError, LogPayload, TaskDetail};

use super::transport::HttpTransport;

/// On-demand reads for a single task. Nothing here is cached: logs are
/// append-only and may have grown since the last look.
pub struct TaskDetailClient {
    transport: HttpTransport,
}

impl TaskDetailClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub async fn fetch_detail(&self, id: &str) -> Result<TaskDetail, FetchError> {
        self.transport.get_json(&["api", "task", id]).await
    }

    pub async fn fetch_log(&self, id: &str) -> Result<LogPayload, FetchError> {
        self.transport.get_json(&["api", "task", id, "log"]).await
    }
}
