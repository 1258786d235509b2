//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/lifelog/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/lifelog/` (~/.config/lifelog/)
//! - Data: `$XDG_DATA_HOME/lifelog/` (~/.local/share/lifelog/)
//! - State/Logs: `$XDG_STATE_HOME/lifelog/` (~/.local/state/lifelog/)

use crate::analytics::{CalendarZone, TimeRange};
use crate::error::{Error, Result};
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
    /// Analytics configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Storage overrides
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Analytics configuration
#[derive(Debug, Deserialize)]
pub struct AnalyticsConfig {
    /// Calendar used to decide "today" and which day a timestamp falls on.
    ///
    /// `local`, `utc`, or a fixed offset such as `+05:30`.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Range used when the caller does not pick one
    #[serde(default)]
    pub default_range: TimeRange,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            default_range: TimeRange::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Parse the configured timezone into a calendar.
    pub fn calendar_zone(&self) -> Result<CalendarZone> {
        self.timezone.parse().map_err(|e: String| {
            Error::Config(format!("analytics.timezone: {}", e))
        })
    }
}

fn default_timezone() -> String {
    "local".to_string()
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Storage configuration
#[derive(Debug, Deserialize, Default)]
pub struct StorageConfig {
    /// Override for the SQLite database location
    pub database_path: Option<PathBuf>,
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
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        // Surface a bad timezone at load time rather than on first use
        config.analytics.calendar_zone()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/lifelog/config.toml` (~/.config/lifelog/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("lifelog").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/lifelog/` (~/.local/share/lifelog/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("lifelog")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/lifelog/` (~/.local/state/lifelog/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("lifelog")
    }

    /// Returns the default database file path
    ///
    /// `$XDG_DATA_HOME/lifelog/data.db` (~/.local/share/lifelog/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }

    /// Database path honoring the `[storage]` override.
    pub fn resolved_database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(Self::database_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analytics.timezone, "local");
        assert_eq!(config.analytics.default_range, TimeRange::Week);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.max_files, 5);
        assert!(config.storage.database_path.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[analytics]
timezone = "utc"
default_range = "month"

[logging]
level = "debug"

[storage]
database_path = "/tmp/lifelog-test.db"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.analytics.default_range, TimeRange::Month);
        assert_eq!(
            config.analytics.calendar_zone().unwrap(),
            CalendarZone::Utc
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.resolved_database_path(),
            PathBuf::from("/tmp/lifelog-test.db")
        );
    }

    #[test]
    fn test_fixed_offset_timezone() {
        let config: Config = toml::from_str("[analytics]\ntimezone = \"+05:30\"\n").unwrap();
        match config.analytics.calendar_zone().unwrap() {
            CalendarZone::Fixed(offset) => assert_eq!(offset.local_minus_utc(), 5 * 3600 + 1800),
            other => panic!("expected fixed offset, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_timezone_rejected_on_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analytics]\ntimezone = \"mars\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("analytics.timezone"));
    }

    #[test]
    fn test_unknown_range_rejected() {
        let parsed: std::result::Result<Config, _> =
            toml::from_str("[analytics]\ndefault_range = \"decade\"\n");
        assert!(parsed.is_err());
    }
}
