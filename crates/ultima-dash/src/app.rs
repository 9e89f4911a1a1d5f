//! Application state and key handling for the ULTIMA dashboard

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tracing::debug;

use crate::api::OrchestratorApi;
use crate::config::DashConfig;
use crate::control::ControlPanel;
use crate::detail::DetailLoader;
use crate::scheduler::RefreshScheduler;
use crate::screen::{Screen, SharedScreen};
use crate::theme::Theme;

/// What a key press asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    StartOrchestrator,
    StopOrchestrator,
    Refresh,
    OpenForm,
    SelectNext,
    SelectPrevious,
    OpenDetail,
    CloseDetail,
    ToggleHelp,
    DismissNotice,
    FormInput(char),
    FormBackspace,
    FormNextField,
    FormCycle { forward: bool },
    SubmitForm,
    HideForm,
}

/// Which layer currently receives keys, topmost first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Notice,
    Form,
    Help,
    Detail,
    Normal,
}

pub fn map_key(key: KeyEvent, mode: InputMode) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        InputMode::Notice => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::DismissNotice),
            _ => None,
        },
        InputMode::Form => match key.code {
            KeyCode::Esc => Some(Action::HideForm),
            KeyCode::Enter => Some(Action::SubmitForm),
            KeyCode::Tab => Some(Action::FormNextField),
            KeyCode::Left => Some(Action::FormCycle { forward: false }),
            KeyCode::Right => Some(Action::FormCycle { forward: true }),
            KeyCode::Backspace => Some(Action::FormBackspace),
            KeyCode::Char(c) => Some(Action::FormInput(c)),
            _ => None,
        },
        InputMode::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
        InputMode::Detail => match key.code {
            KeyCode::Esc => Some(Action::CloseDetail),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('s') => Some(Action::StartOrchestrator),
            KeyCode::Char('x') => Some(Action::StopOrchestrator),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('n') => Some(Action::OpenForm),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrevious),
            KeyCode::Enter => Some(Action::OpenDetail),
            _ => None,
        },
    }
}

/// Main application state
pub struct App {
    pub api_url: String,
    pub theme: Theme,
    pub screen: SharedScreen,
    pub scheduler: RefreshScheduler,
    pub panel: ControlPanel,
    pub details: DetailLoader,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(api: Arc<dyn OrchestratorApi>, config: &DashConfig) -> Self {
        let screen = Screen::shared();
        let scheduler =
            RefreshScheduler::new(api.clone(), screen.clone(), config.scheduler_config());
        let panel = ControlPanel::new(
            api.clone(),
            screen.clone(),
            scheduler.handle(),
            config.settle_delay(),
        );
        let details = DetailLoader::new(api, screen.clone());

        Self {
            api_url: config.api_url.clone(),
            theme: Theme::from_name(&config.theme),
            screen,
            scheduler,
            panel,
            details,
            show_help: false,
            should_quit: false,
        }
    }

    pub async fn input_mode(&self) -> InputMode {
        let screen = self.screen.read().await;
        if screen.notice.is_some() {
            InputMode::Notice
        } else if screen.form.visible {
            InputMode::Form
        } else if self.show_help {
            InputMode::Help
        } else if screen.detail.is_some() {
            InputMode::Detail
        } else {
            InputMode::Normal
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        let mode = self.input_mode().await;
        if let Some(action) = map_key(key, mode) {
            self.apply(action).await;
        }
    }

    /// Commands and detail loads run on their own tasks so the draw loop
    /// keeps ticking while they wait on the backend.
    pub async fn apply(&mut self, action: Action) {
        debug!("Applying {:?}", action);
        match action {
            Action::Quit => {
                self.scheduler.stop();
                self.should_quit = true;
            }
            Action::StartOrchestrator => {
                let panel = self.panel.clone();
                tokio::spawn(async move { panel.start().await });
            }
            Action::StopOrchestrator => {
                let panel = self.panel.clone();
                tokio::spawn(async move { panel.stop().await });
            }
            Action::Refresh => self.scheduler.trigger_once(),
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::OpenDetail => {
                let selected = self
                    .screen
                    .read()
                    .await
                    .selected_task_id()
                    .map(str::to_string);
                if let Some(task_id) = selected {
                    let details = self.details.clone();
                    tokio::spawn(async move { details.open(&task_id).await });
                }
            }
            Action::CloseDetail => self.details.close().await,
            Action::SubmitForm => {
                let task = self.screen.read().await.form.to_new_task();
                let panel = self.panel.clone();
                tokio::spawn(async move { panel.create_task(task).await });
            }
            _ => self.apply_to_screen(action).await,
        }
    }

    async fn apply_to_screen(&self, action: Action) {
        let mut screen = self.screen.write().await;
        match action {
            Action::SelectNext => screen.select_next(),
            Action::SelectPrevious => screen.select_previous(),
            Action::DismissNotice => screen.dismiss_notice(),
            Action::OpenForm => screen.form.open(),
            Action::HideForm => screen.form.hide(),
            Action::FormInput(c) => screen.form.push_char(c),
            Action::FormBackspace => screen.form.backspace(),
            Action::FormNextField => screen.form.next_field(),
            Action::FormCycle { forward } => screen.form.cycle(forward),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use std::time::Duration;
    use tokio::time::sleep;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_normal_keys() {
        let mode = InputMode::Normal;
        assert_eq!(map_key(press(KeyCode::Char('s')), mode), Some(Action::StartOrchestrator));
        assert_eq!(map_key(press(KeyCode::Char('x')), mode), Some(Action::StopOrchestrator));
        assert_eq!(map_key(press(KeyCode::Char('r')), mode), Some(Action::Refresh));
        assert_eq!(map_key(press(KeyCode::Enter), mode), Some(Action::OpenDetail));
        assert_eq!(map_key(press(KeyCode::Esc), mode), None);
    }

    #[test]
    fn test_form_swallows_command_keys() {
        let mode = InputMode::Form;
        assert_eq!(map_key(press(KeyCode::Char('q')), mode), Some(Action::FormInput('q')));
        assert_eq!(map_key(press(KeyCode::Char('s')), mode), Some(Action::FormInput('s')));
        assert_eq!(map_key(press(KeyCode::Esc), mode), Some(Action::HideForm));
        assert_eq!(
            map_key(press(KeyCode::Right), mode),
            Some(Action::FormCycle { forward: true })
        );
    }

    #[test]
    fn test_notice_blocks_everything_but_dismiss() {
        let mode = InputMode::Notice;
        assert_eq!(map_key(press(KeyCode::Char('s')), mode), None);
        assert_eq!(map_key(press(KeyCode::Enter), mode), Some(Action::DismissNotice));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c, mode), Some(Action::Quit));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_opens_selected_task() {
        let api = Arc::new(FakeApi::healthy());
        let mut app = App::new(api.clone(), &DashConfig::default());
        app.scheduler.start();
        sleep(Duration::from_millis(300)).await;

        app.handle_key(press(KeyCode::Down)).await;
        app.handle_key(press(KeyCode::Enter)).await;
        sleep(Duration::from_millis(300)).await;

        assert_eq!(app.input_mode().await, InputMode::Detail);
        let screen = app.screen.read().await;
        assert_eq!(screen.detail.as_ref().unwrap().task_id, "task-1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_and_submitting_the_form() {
        let api = Arc::new(FakeApi::healthy());
        let mut app = App::new(api.clone(), &DashConfig::default());

        app.handle_key(press(KeyCode::Char('n'))).await;
        assert_eq!(app.input_mode().await, InputMode::Form);
        for c in "Check disk".chars() {
            app.handle_key(press(KeyCode::Char(c))).await;
        }
        app.handle_key(press(KeyCode::Enter)).await;
        sleep(Duration::from_millis(300)).await;

        assert_eq!(api.created.lock().unwrap()[0].description, "Check disk");
        assert_eq!(app.input_mode().await, InputMode::Normal);
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_keeps_form_contents() {
        let api = Arc::new(FakeApi::healthy());
        let mut app = App::new(api, &DashConfig::default());

        app.handle_key(press(KeyCode::Char('n'))).await;
        app.handle_key(press(KeyCode::Char('a'))).await;
        app.handle_key(press(KeyCode::Esc)).await;
        app.handle_key(press(KeyCode::Char('n'))).await;

        assert_eq!(app.screen.read().await.form.description, "a");
    }

    #[tokio::test]
    async fn test_quit_stops_scheduler() {
        let api = Arc::new(FakeApi::healthy());
        let mut app = App::new(api, &DashConfig::default());
        app.scheduler.start();

        app.handle_key(press(KeyCode::Char('q'))).await;

        assert!(app.should_quit);
        assert!(!app.scheduler.is_running());
    }
}
