use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ultima_types::{UltimaError, UltimaResult};

use crate::config::LoggingConfig;

/// Installs the global subscriber writing to the configured log file.
///
/// `RUST_LOG` wins over everything; otherwise each `-v` raises the level
/// above what the config asks for. Returns the file being written.
pub fn init_logging(config: &LoggingConfig, verbose: u8) -> UltimaResult<PathBuf> {
    let level = match verbose {
        0 => config.level.to_string(),
        1 => "info,ultima_dash=debug".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let path = config.log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;

    let file_layer = fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(verbose >= 2);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| UltimaError::Config(format!("Failed to install logger: {}", e)))?;

    Ok(path)
}
