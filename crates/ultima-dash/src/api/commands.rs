use tracing::info;
use ultima_types::{CommandError, CommandResponse, NewTask};

use super::transport::HttpTransport;

const START_PATH: &[&str] = &["api", "ultima", "start"];
const STOP_PATH: &[&str] = &["api", "ultima", "stop"];
const CREATE_PATH: &[&str] = &["api", "tasks", "create"];

/// Mutating calls. One request each, never retried here.
pub struct CommandClient {
    transport: HttpTransport,
}

impl CommandClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub async fn start(&self) -> Result<Option<String>, CommandError> {
        info!("Requesting orchestrator start");
        let response: CommandResponse = self.transport.post_json::<(), _>(START_PATH, None).await?;
        response.into_result()
    }

    pub async fn stop(&self) -> Result<Option<String>, CommandError> {
        info!("Requesting orchestrator stop");
        let response: CommandResponse = self.transport.post_json::<(), _>(STOP_PATH, None).await?;
        response.into_result()
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Option<String>, CommandError> {
        info!("Creating {} task ({} priority)", task.task_type, task.priority);
        let response: CommandResponse = self.transport.post_json(CREATE_PATH, Some(task)).await?;
        response.into_result()
    }
}
