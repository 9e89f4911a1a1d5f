//! ULTIMA Dashboard
//! Usage: ultima-dash [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Config file [default: ~/.ultima/dash.toml]
//!   --api-url <URL>   Orchestrator backend [default: http://127.0.0.1:5000]
//!   --theme <THEME>   Dashboard theme (matrix, dark, light)

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use ultima_dash::api::{HttpBackend, OrchestratorApi};
use ultima_dash::app::App;
use ultima_dash::config::DashConfig;
use ultima_dash::logging::init_logging;
use ultima_dash::ui::{render_ui, Chrome};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "ultima-dash")]
#[command(about = "ULTIMA Dashboard - watch and drive the task orchestrator from a terminal")]
#[command(version = VERSION)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, env = "ULTIMA_DASH_CONFIG")]
    config: Option<PathBuf>,

    /// Orchestrator backend URL
    #[arg(long)]
    api_url: Option<String>,

    /// Dashboard theme (matrix, dark, light)
    #[arg(long)]
    theme: Option<String>,

    /// Refresh interval in milliseconds
    #[arg(long)]
    refresh_ms: Option<u64>,

    /// Log file (the terminal is taken by the dashboard)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable mouse capture
    #[arg(long)]
    no_mouse: bool,
}

impl Cli {
    fn apply(&self, config: &mut DashConfig) {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        if let Some(ms) = self.refresh_ms {
            config.refresh_interval_ms = ms;
        }
        if let Some(path) = &self.log_file {
            config.logging.file = Some(path.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(DashConfig::default_path);
    let mut config = DashConfig::load(&config_path)?;
    cli.apply(&mut config);
    config.validate()?;

    let log_path = init_logging(&config.logging, cli.verbose)?;
    info!("ULTIMA dashboard v{} starting", VERSION);
    info!("Backend {} (config {:?}, log {:?})", config.api_url, config_path, log_path);
    for warning in config.warnings() {
        warn!("{}", warning);
    }

    let api: Arc<dyn OrchestratorApi> =
        Arc::new(HttpBackend::new(&config.api_url, config.request_timeout())?);
    let mut app = App::new(api, &config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if !cli.no_mouse {
        execute!(stdout, EnableMouseCapture)?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    if !cli.no_mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    info!("ULTIMA dashboard exiting");
    Ok(())
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    app.scheduler.start();

    loop {
        {
            let screen = app.screen.read().await;
            let chrome = Chrome {
                theme: &app.theme,
                api_url: &app.api_url,
                show_help: app.show_help,
            };
            terminal.draw(|f| render_ui(f, &chrome, &screen))?;
        }

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key).await;
                }
            }
        }

        if app.should_quit {
            app.scheduler.stop();
            return Ok(());
        }
    }
}
