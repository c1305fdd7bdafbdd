//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/buildlog/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/buildlog/` (~/.config/buildlog/)
//! - Data: `$XDG_DATA_HOME/buildlog/` (~/.local/share/buildlog/)
//! - State/Logs: `$XDG_STATE_HOME/buildlog/` (~/.local/state/buildlog/)

use crate::error::{Error, Result};
use crate::verbosity::Verbosity;
use serde::Deserialize;
use std::path::{Path, PathBuf};

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
    /// Terminal sink
    #[serde(default)]
    pub terminal: TerminalConfig,

    /// Log file sink
    #[serde(default)]
    pub file: FileConfig,

    /// SQLite sink
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Filter for buildlog's own diagnostics
    #[serde(default)]
    pub tracing: TracingConfig,
}

/// Terminal sink configuration
#[derive(Debug, Deserialize)]
pub struct TerminalConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub verbosity: Verbosity,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            verbosity: Verbosity::default(),
        }
    }
}

/// Log file sink configuration
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub verbosity: Verbosity,

    /// Target file; defaults to [`Config::log_path`]
    pub path: Option<PathBuf>,
}

impl FileConfig {
    /// The configured path, or the XDG default.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(Config::log_path)
    }
}

/// SQLite sink configuration
#[derive(Debug, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Database file; defaults to [`Config::database_path`]
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    /// The configured path, or the XDG default.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(Config::database_path)
    }
}

/// Internal diagnostics configuration
#[derive(Debug, Deserialize)]
pub struct TracingConfig {
    /// Filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_tracing_level")]
    pub level: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: default_tracing_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/buildlog/config.toml` (~/.config/buildlog/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("buildlog").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/buildlog/` (~/.local/share/buildlog/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("buildlog")
    }

    /// Returns the state directory path (for log files)
    ///
    /// `$XDG_STATE_HOME/buildlog/` (~/.local/state/buildlog/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("buildlog")
    }

    /// Returns the default database file path
    ///
    /// `$XDG_DATA_HOME/buildlog/logs.db` (~/.local/share/buildlog/logs.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("logs.db")
    }

    /// Returns the default log file path
    ///
    /// `$XDG_STATE_HOME/buildlog/buildlog.log` (~/.local/state/buildlog/buildlog.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("buildlog.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
