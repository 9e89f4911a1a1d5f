//! Task detail overlay loading.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::OrchestratorApi;
use crate::screen::SharedScreen;
use crate::view::{render_detail, render_detail_loading};

/// Fetches a task's record and log together and puts the result in the
/// overlay. Only the most recent request may write: opening another task,
/// or closing the overlay, makes earlier responses stale.
#[derive(Clone)]
pub struct DetailLoader {
    api: Arc<dyn OrchestratorApi>,
    screen: SharedScreen,
    ticket: Arc<AtomicU64>,
}

impl DetailLoader {
    pub fn new(api: Arc<dyn OrchestratorApi>, screen: SharedScreen) -> Self {
        Self {
            api,
            screen,
            ticket: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn open(&self, task_id: &str) {
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.screen.write().await.detail = Some(render_detail_loading(task_id));

        let (detail, log) = tokio::join!(
            self.api.fetch_detail(task_id),
            self.api.fetch_log(task_id)
        );
        if let Err(e) = &detail {
            warn!("Failed to load task {}: {}", task_id, e);
        }
        if let Err(e) = &log {
            warn!("Failed to load log for task {}: {}", task_id, e);
        }
        let view = render_detail(task_id, detail.as_ref(), log.as_ref());

        let mut screen = self.screen.write().await;
        let still_open = screen
            .detail
            .as_ref()
            .is_some_and(|current| current.task_id == task_id);
        if self.ticket.load(Ordering::SeqCst) != ticket || !still_open {
            debug!("Dropping stale detail for task {}", task_id);
            return;
        }
        screen.detail = Some(view);
    }

    pub async fn close(&self) {
        self.ticket.fetch_add(1, Ordering::SeqCst);
        self.screen.write().await.detail = None;
    }
}
