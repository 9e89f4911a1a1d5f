//! Dashboard configuration.
//!
//! Resolution order: TOML file, then `ULTIMA_*` environment variables,
//! then command line flags (applied by the binary), then `validate()`.

mod logging;

pub use logging::{LogLevel, LoggingConfig};

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use ultima_types::{
    UltimaError, UltimaResult, DEFAULT_REFRESH_INTERVAL_MS, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_SETTLE_DELAY_MS, DEFAULT_TASK_WINDOW,
};

use crate::scheduler::SchedulerConfig;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub api_url: String,
    pub refresh_interval_ms: u64,
    /// Wait between a successful command and the refresh it triggers.
    pub settle_delay_ms: u64,
    pub request_timeout_ms: u64,
    pub task_window: usize,
    pub theme: String,
    pub logging: LoggingConfig,
    /// Problems noticed while loading; logged once the subscriber is up.
    #[serde(skip)]
    pub load_warnings: Vec<String>,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            task_window: DEFAULT_TASK_WINDOW,
            theme: "matrix".to_string(),
            logging: LoggingConfig::default(),
            load_warnings: Vec::new(),
        }
    }
}

impl DashConfig {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ultima")
            .join("dash.toml")
    }

    /// Reads the file if it exists and applies environment overrides.
    /// Callers validate once their own overrides are in.
    pub fn load(path: impl AsRef<Path>) -> UltimaResult<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| UltimaError::Config(format!("Failed to read config: {}", e)))?;

            toml::from_str(&contents)
                .map_err(|e| UltimaError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            let mut config = Self::default();
            config
                .load_warnings
                .push(format!("Config file {:?} not found, using defaults", path));
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> UltimaResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| UltimaError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path.as_ref(), contents)?;

        info!("Configuration saved to {:?}", path.as_ref());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("ULTIMA_API_URL") {
            self.api_url = url;
        }

        if let Some(ms) = lookup("ULTIMA_REFRESH_MS") {
            match ms.parse() {
                Ok(ms) => self.refresh_interval_ms = ms,
                Err(_) => self
                    .load_warnings
                    .push(format!("Ignoring invalid ULTIMA_REFRESH_MS: {}", ms)),
            }
        }

        if let Some(level) = lookup("ULTIMA_LOG_LEVEL") {
            match level.parse() {
                Ok(level) => self.logging.level = level,
                Err(e) => self.load_warnings.push(format!("Ignoring ULTIMA_LOG_LEVEL: {}", e)),
            }
        }
    }

    pub fn validate(&self) -> UltimaResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(UltimaError::Config("API URL cannot be empty".into()));
        }

        let url = Url::parse(&self.api_url)
            .map_err(|e| UltimaError::Config(format!("Invalid API URL '{}': {}", self.api_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UltimaError::Config(format!(
                "API URL must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.refresh_interval_ms == 0 {
            return Err(UltimaError::Config("Refresh interval cannot be 0".into()));
        }

        if self.request_timeout_ms == 0 {
            return Err(UltimaError::Config("Request timeout cannot be 0".into()));
        }

        if self.task_window == 0 {
            return Err(UltimaError::Config("Task window must show at least one task".into()));
        }

        Ok(())
    }

    /// Everything worth a warning in the log: load-time problems plus
    /// settings that are valid but work against each other.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = self.load_warnings.clone();
        if self.request_timeout_ms > self.refresh_interval_ms {
            warnings.push(format!(
                "Request timeout ({} ms) exceeds refresh interval ({} ms); slow cycles will skip ticks",
                self.request_timeout_ms, self.refresh_interval_ms
            ));
        }
        warnings
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            interval: self.refresh_interval(),
            task_window: self.task_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ultima-dash-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = DashConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_url, "http://127.0.0.1:5000");
        assert_eq!(config.refresh_interval(), Duration::from_millis(3_000));
        assert_eq!(config.settle_delay(), Duration::from_millis(1_500));
        assert_eq!(config.scheduler_config().task_window, 10);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = DashConfig::load(temp_path("missing")).unwrap();
        assert_eq!(config.task_window, DEFAULT_TASK_WINDOW);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let path = temp_path("partial");
        std::fs::write(&path, "api_url = \"http://ultima.local:5000\"\n\n[logging]\nlevel = \"debug\"\n")
            .unwrap();

        let config = DashConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.refresh_interval_ms, DEFAULT_REFRESH_INTERVAL_MS);
    }

    #[test]
    fn test_unparseable_file_is_config_error() {
        let path = temp_path("broken");
        std::fs::write(&path, "refresh_interval_ms = \"soon\"").unwrap();

        let err = DashConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, UltimaError::Config(_)));
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved");
        let config = DashConfig {
            task_window: 25,
            theme: "dark".into(),
            ..DashConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = DashConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.task_window, 25);
        assert_eq!(loaded.theme, "dark");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ULTIMA_API_URL", "https://ops.example.com"),
            ("ULTIMA_REFRESH_MS", "not-a-number"),
            ("ULTIMA_LOG_LEVEL", "TRACE"),
        ]);
        let mut config = DashConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_url, "https://ops.example.com");
        assert_eq!(config.refresh_interval_ms, DEFAULT_REFRESH_INTERVAL_MS);
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert_eq!(
            config.load_warnings,
            vec!["Ignoring invalid ULTIMA_REFRESH_MS: not-a-number".to_string()]
        );
    }

    #[test]
    fn test_warnings_survive_until_logging_is_up() {
        let config = DashConfig::load(temp_path("absent")).unwrap();
        assert!(config.warnings().iter().any(|w| w.contains("not found, using defaults")));

        let slow = DashConfig {
            request_timeout_ms: 5_000,
            refresh_interval_ms: 1_000,
            ..DashConfig::default()
        };
        assert!(slow.validate().is_ok());
        assert_eq!(slow.warnings().len(), 1);
        assert!(slow.warnings()[0].contains("exceeds refresh interval"));

        let quick = DashConfig {
            request_timeout_ms: 1_000,
            ..DashConfig::default()
        };
        assert!(quick.warnings().is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            DashConfig { api_url: "".into(), ..DashConfig::default() },
            DashConfig { api_url: "ftp://host".into(), ..DashConfig::default() },
            DashConfig { api_url: "not a url".into(), ..DashConfig::default() },
            DashConfig { refresh_interval_ms: 0, ..DashConfig::default() },
            DashConfig { request_timeout_ms: 0, ..DashConfig::default() },
            DashConfig { task_window: 0, ..DashConfig::default() },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{:?} should be rejected", config.api_url);
        }
    }
}
