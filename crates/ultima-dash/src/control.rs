//! Start, stop and create-task commands.
//!
//! Each command is a single mutating call. Success is logged to the
//! activity feed and followed by a refresh once the backend has had time
//! to settle; failure raises a blocking notice and is not retried.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use ultima_types::{CommandError, NewTask};

use crate::api::OrchestratorApi;
use crate::scheduler::SchedulerHandle;
use crate::screen::{ActivityLevel, SharedScreen};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandAction {
    Start,
    Stop,
    CreateTask,
}

impl CommandAction {
    pub fn label(&self) -> &'static str {
        match self {
            CommandAction::Start => "start",
            CommandAction::Stop => "stop",
            CommandAction::CreateTask => "create task",
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            CommandAction::Start => "ULTIMA start requested",
            CommandAction::Stop => "ULTIMA stop requested",
            CommandAction::CreateTask => "Task created",
        }
    }
}

impl fmt::Display for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandState {
    Idle,
    Submitting,
}

#[derive(Default)]
struct Slots {
    start: AtomicBool,
    stop: AtomicBool,
    create: AtomicBool,
}

impl Slots {
    fn get(&self, action: CommandAction) -> &AtomicBool {
        match action {
            CommandAction::Start => &self.start,
            CommandAction::Stop => &self.stop,
            CommandAction::CreateTask => &self.create,
        }
    }
}

/// Frees an action slot when the dispatch finishes, whichever way it ends.
struct SlotGuard<'a>(&'a AtomicBool);

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct ControlPanel {
    api: Arc<dyn OrchestratorApi>,
    screen: SharedScreen,
    scheduler: SchedulerHandle,
    settle_delay: Duration,
    slots: Arc<Slots>,
}

impl ControlPanel {
    pub fn new(
        api: Arc<dyn OrchestratorApi>,
        screen: SharedScreen,
        scheduler: SchedulerHandle,
        settle_delay: Duration,
    ) -> Self {
        Self {
            api,
            screen,
            scheduler,
            settle_delay,
            slots: Arc::new(Slots::default()),
        }
    }

    pub fn command_state(&self, action: CommandAction) -> CommandState {
        if self.slots.get(action).load(Ordering::SeqCst) {
            CommandState::Submitting
        } else {
            CommandState::Idle
        }
    }

    pub async fn start(&self) -> Result<(), CommandError> {
        self.dispatch(CommandAction::Start, self.api.start_orchestrator())
            .await
    }

    pub async fn stop(&self) -> Result<(), CommandError> {
        self.dispatch(CommandAction::Stop, self.api.stop_orchestrator())
            .await
    }

    /// Rejects an empty description locally; the form is cleared and
    /// hidden only once the backend accepts the task.
    pub async fn create_task(&self, task: NewTask) -> Result<(), CommandError> {
        if let Err(e) = task.validate() {
            self.screen
                .write()
                .await
                .show_notice("Create task", e.user_message());
            return Err(e);
        }
        self.dispatch(CommandAction::CreateTask, self.api.create_task(&task))
            .await
    }

    async fn dispatch<F>(&self, action: CommandAction, request: F) -> Result<(), CommandError>
    where
        F: Future<Output = Result<Option<String>, CommandError>>,
    {
        let slot = self.slots.get(action);
        if slot.swap(true, Ordering::SeqCst) {
            debug!("Ignoring {} while a previous one is submitting", action);
            return Err(CommandError::Busy(action.label()));
        }
        let _guard = SlotGuard(slot);

        info!("Sending {} command", action);
        match request.await {
            Ok(message) => {
                self.on_success(action, message).await;
                Ok(())
            }
            Err(e) => {
                warn!("{} command failed: {}", action, e);
                let mut screen = self.screen.write().await;
                screen.show_notice(&format!("Could not {}", action), e.user_message());
                screen.add_activity(ActivityLevel::Error, &format!("{} failed", action));
                Err(e)
            }
        }
    }

    async fn on_success(&self, action: CommandAction, message: Option<String>) {
        {
            let mut screen = self.screen.write().await;
            let text = message.unwrap_or_else(|| action.success_message().to_string());
            screen.add_activity(ActivityLevel::Info, &text);
            if action == CommandAction::CreateTask {
                screen.form.clear();
                screen.form.hide();
            }
        }

        let scheduler = self.scheduler.clone();
        let delay = self.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            scheduler.trigger_once();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::scheduler::{RefreshScheduler, SchedulerConfig};
    use crate::screen::Screen;
    use tokio::time::sleep;
    use ultima_types::TaskPriority;

    struct Rig {
        api: Arc<FakeApi>,
        screen: SharedScreen,
        scheduler: RefreshScheduler,
        panel: ControlPanel,
    }

    fn rig(api: FakeApi) -> Rig {
        let api = Arc::new(api);
        let screen = Screen::shared();
        let scheduler =
            RefreshScheduler::new(api.clone(), screen.clone(), SchedulerConfig::default());
        let panel = ControlPanel::new(
            api.clone(),
            screen.clone(),
            scheduler.handle(),
            Duration::from_millis(1_500),
        );
        Rig {
            api,
            screen,
            scheduler,
            panel,
        }
    }

    async fn fill_form(screen: &SharedScreen, description: &str) -> NewTask {
        let mut screen = screen.write().await;
        screen.form.open();
        screen.form.description = description.to_string();
        screen.form.priority = TaskPriority::High;
        screen.form.to_new_task()
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_double_start_sends_one_request() {
        let rig = rig(FakeApi::healthy());

        let (first, second) = tokio::join!(rig.panel.start(), rig.panel.start());

        assert!(first.is_ok());
        assert_eq!(second, Err(CommandError::Busy("start")));
        assert_eq!(rig.api.start_calls.total(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_are_independent() {
        let rig = rig(FakeApi::healthy());

        let (start, stop) = tokio::join!(rig.panel.start(), rig.panel.stop());

        assert!(start.is_ok());
        assert!(stop.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_command_state_while_submitting() {
        let rig = rig(FakeApi::healthy());
        let panel = rig.panel.clone();
        let pending = tokio::spawn(async move { panel.stop().await });

        sleep(Duration::from_millis(50)).await;
        assert_eq!(rig.panel.command_state(CommandAction::Stop), CommandState::Submitting);
        assert_eq!(rig.panel.command_state(CommandAction::Start), CommandState::Idle);

        pending.await.unwrap().unwrap();
        assert_eq!(rig.panel.command_state(CommandAction::Stop), CommandState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_success_clears_form_and_refreshes() {
        let rig = rig(FakeApi::healthy());
        rig.scheduler.start();
        sleep(Duration::from_millis(300)).await;
        assert_eq!(rig.api.status_calls.total(), 1);

        let task = fill_form(&rig.screen, "Build API").await;
        rig.panel.create_task(task).await.unwrap();

        {
            let screen = rig.screen.read().await;
            assert!(!screen.form.visible);
            assert!(screen.form.description.is_empty());
            assert!(screen.notice.is_none());
        }
        assert_eq!(rig.api.created.lock().unwrap()[0].description, "Build API");

        // settle delay elapses well before the next 3s tick
        sleep(Duration::from_millis(1_800)).await;
        assert_eq!(rig.api.status_calls.total(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_create_keeps_form() {
        let rig = rig(FakeApi::healthy());
        *rig.api.command.lock().unwrap() = Err(CommandError::Rejected("queue full".into()));
        rig.scheduler.start();
        sleep(Duration::from_millis(300)).await;

        let task = fill_form(&rig.screen, "Build API").await;
        let err = rig.panel.create_task(task).await.unwrap_err();
        assert_eq!(err, CommandError::Rejected("queue full".into()));

        sleep(Duration::from_millis(2_000)).await;
        assert_eq!(rig.api.status_calls.total(), 1);

        let screen = rig.screen.read().await;
        assert!(screen.form.visible);
        assert_eq!(screen.form.description, "Build API");
        assert_eq!(screen.notice.as_ref().unwrap().message, "queue full");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_description_sends_nothing() {
        let rig = rig(FakeApi::healthy());

        let task = fill_form(&rig.screen, "   ").await;
        let err = rig.panel.create_task(task).await.unwrap_err();

        assert!(matches!(err, CommandError::InvalidInput(_)));
        assert_eq!(rig.api.create_calls.total(), 0);
        let screen = rig.screen.read().await;
        assert_eq!(
            screen.notice.as_ref().unwrap().message,
            "Please enter a task description"
        );
    }
}
