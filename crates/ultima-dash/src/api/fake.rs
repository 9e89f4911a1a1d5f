//! In-memory backend for exercising the refresh loop and commands under
//! paused tokio time.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use ultima_types::{
    CommandError, FetchError, LogPayload, NewTask, OrchestratorStatus, StatusKind, TaskDetail,
    TaskSummary,
};

use super::OrchestratorApi;

#[derive(Default)]
pub(crate) struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub(crate) fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

pub(crate) struct FakeApi {
    pub status: Mutex<Result<OrchestratorStatus, FetchError>>,
    pub tasks: Mutex<Result<Vec<TaskSummary>, FetchError>>,
    pub detail: Mutex<Result<TaskDetail, FetchError>>,
    pub log: Mutex<Result<LogPayload, FetchError>>,
    pub command: Mutex<Result<Option<String>, CommandError>>,
    pub latency: Mutex<Duration>,
    pub status_calls: Gauge,
    pub task_calls: Gauge,
    pub detail_calls: Gauge,
    pub start_calls: Gauge,
    pub stop_calls: Gauge,
    pub create_calls: Gauge,
    pub created: Mutex<Vec<NewTask>>,
}

impl FakeApi {
    pub(crate) fn healthy() -> Self {
        Self {
            status: Mutex::new(Ok(sample_status(true))),
            tasks: Mutex::new(Ok(sample_tasks(3))),
            detail: Mutex::new(Ok(sample_detail("42"))),
            log: Mutex::new(Ok(LogPayload {
                log: vec!["agent booted\n".into(), "task done\n".into()],
            })),
            command: Mutex::new(Ok(Some("ok".into()))),
            latency: Mutex::new(Duration::from_millis(200)),
            status_calls: Gauge::default(),
            task_calls: Gauge::default(),
            detail_calls: Gauge::default(),
            start_calls: Gauge::default(),
            stop_calls: Gauge::default(),
            create_calls: Gauge::default(),
            created: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap() = latency;
        self
    }

    async fn pause(&self) {
        let latency = *self.latency.lock().unwrap();
        tokio::time::sleep(latency).await;
    }
}

pub(crate) fn sample_status(running: bool) -> OrchestratorStatus {
    OrchestratorStatus {
        running,
        pid: running.then_some(4242),
        total_tasks: 5,
        status_counts: BTreeMap::from([
            ("completed".to_string(), 3),
            ("pending".to_string(), 1),
            ("failed".to_string(), 1),
        ]),
        agent_counts: BTreeMap::from([("coder".to_string(), 4), ("tester".to_string(), 1)]),
        type_counts: BTreeMap::from([("general".to_string(), 5)]),
    }
}

pub(crate) fn sample_tasks(count: usize) -> Vec<TaskSummary> {
    (0..count)
        .map(|i| TaskSummary {
            id: format!("task-{}", i),
            description: format!("Task number {}", i),
            status: StatusKind::KNOWN[i % 4],
            agent: "coder".into(),
            source: "executed".into(),
            task_type: Some("general".into()),
            priority: Some("medium".into()),
            created_at: chrono::DateTime::from_timestamp(1_714_000_000 - i as i64 * 60, 0),
        })
        .collect()
}

pub(crate) fn sample_detail(id: &str) -> TaskDetail {
    TaskDetail {
        id: id.into(),
        status: StatusKind::Completed,
        agent: "coder".into(),
        description: "Build API".into(),
        metadata: BTreeMap::from([("priority".to_string(), serde_json::json!("high"))]),
    }
}

#[async_trait]
impl OrchestratorApi for FakeApi {
    async fn fetch_status(&self) -> Result<OrchestratorStatus, FetchError> {
        self.status_calls.enter();
        self.pause().await;
        self.status_calls.leave();
        self.status.lock().unwrap().clone()
    }

    async fn fetch_tasks(&self) -> Result<Vec<TaskSummary>, FetchError> {
        self.task_calls.enter();
        self.pause().await;
        self.task_calls.leave();
        self.tasks.lock().unwrap().clone()
    }

    async fn fetch_detail(&self, _id: &str) -> Result<TaskDetail, FetchError> {
        self.detail_calls.enter();
        self.pause().await;
        self.detail_calls.leave();
        self.detail.lock().unwrap().clone()
    }

    async fn fetch_log(&self, _id: &str) -> Result<LogPayload, FetchError> {
        self.pause().await;
        self.log.lock().unwrap().clone()
    }

    async fn start_orchestrator(&self) -> Result<Option<String>, CommandError> {
        self.start_calls.enter();
        self.pause().await;
        self.start_calls.leave();
        self.command.lock().unwrap().clone()
    }

    async fn stop_orchestrator(&self) -> Result<Option<String>, CommandError> {
        self.stop_calls.enter();
        self.pause().await;
        self.stop_calls.leave();
        self.command.lock().unwrap().clone()
    }

    async fn create_task(&self, task: &NewTask) -> Result<Option<String>, CommandError> {
        self.create_calls.enter();
        self.created.lock().unwrap().push(task.clone());
        self.pause().await;
        self.create_calls.leave();
        self.command.lock().unwrap().clone()
    }
}
