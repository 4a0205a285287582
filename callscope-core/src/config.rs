//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/callscope/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/callscope/` (~/.config/callscope/)
//! - Data/Exports: `$XDG_DATA_HOME/callscope/` (~/.local/share/callscope/)
//! - State/Logs: `$XDG_STATE_HOME/callscope/` (~/.local/state/callscope/)

use crate::error::{Error, Result};
use crate::types::QueueFilter;
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Reporting backend connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// UI theme. Explicit application-wide state, handed down to every
    /// renderer rather than toggled on a shared global.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Spreadsheet export configuration
    #[serde(default)]
    pub export: ExportConfig,

    /// Default filter values
    #[serde(default)]
    pub filters: FiltersConfig,
}

/// Reporting backend configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Backend base URL (e.g., `http://localhost:8090`)
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Optional bearer token for the backend
    pub api_key: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(Error::Config(
                "backend.server_url must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "backend.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_server_url() -> String {
    "http://localhost:8090".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// UI theme mode
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

/// Theme configuration
#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct ThemeConfig {
    /// Color scheme for the TUI
    #[serde(default)]
    pub mode: ThemeMode,
}

/// Spreadsheet export configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// Directory exported .xlsx files are written to.
    /// Defaults to the XDG data dir.
    #[serde(default = "default_export_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_export_dir(),
        }
    }
}

fn default_export_dir() -> PathBuf {
    Config::data_dir().join("exports")
}

/// Default filter values applied at startup
#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct FiltersConfig {
    /// Queue selected when the dashboard opens
    #[serde(default)]
    pub queue: QueueFilter,
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/callscope/config.toml` (~/.config/callscope/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("callscope").join("config.toml")
    }

    /// Returns the data directory path (for exports)
    ///
    /// `$XDG_DATA_HOME/callscope/` (~/.local/share/callscope/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("callscope")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/callscope/` (~/.local/state/callscope/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("callscope")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/callscope/callscope.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("callscope.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.server_url, "http://localhost:8090");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.theme.mode, ThemeMode::Dark);
        assert_eq!(config.filters.queue, QueueFilter::All);
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
            [backend]
            server_url = "http://reports.internal:9000"
            timeout_secs = 10

            [theme]
            mode = "light"

            [filters]
            queue = "m10"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.server_url, "http://reports.internal:9000");
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.theme.mode, ThemeMode::Light);
        assert_eq!(config.filters.queue, QueueFilter::M10);
    }

    #[test]
    fn test_backend_validate() {
        let mut backend = BackendConfig::default();
        assert!(backend.validate().is_ok());
        backend.server_url = String::new();
        assert!(backend.validate().is_err());
    }
}
