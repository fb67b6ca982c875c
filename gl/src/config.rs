//! Goalie configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::day::{DEFAULT_START_HOUR, DayBoundary};

/// Main Goalie configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Day boundary configuration
    pub day: DayConfig,

    /// Terminal UI configuration
    pub tui: TuiConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .goalie.yml
        let local_config = PathBuf::from(".goalie.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/goalie/goalie.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("goalie").join("goalie.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, before logging is set up
    ///
    /// Any failure yields None; the full load reports it later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = [
            config_path.cloned(),
            Some(PathBuf::from(".goalie.yml")),
            dirs::config_dir().map(|d| d.join("goalie").join("goalie.yml")),
        ];
        candidates
            .into_iter()
            .flatten()
            .find(|p| p.exists())
            .and_then(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file
    #[serde(rename = "db-path")]
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("goalie")
                .join(goalstore::DB_FILENAME),
        }
    }
}

/// Day boundary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DayConfig {
    /// Hour (0-23) at which a new day begins
    #[serde(rename = "start-hour")]
    pub start_hour: u32,
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
        }
    }
}

impl DayConfig {
    pub fn boundary(&self) -> DayBoundary {
        DayBoundary::new(self.start_hour)
    }
}

/// Terminal UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Event poll interval in milliseconds
    #[serde(rename = "tick-rate-ms")]
    pub tick_rate_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 250 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.day.start_hour, 4);
        assert_eq!(config.tui.tick_rate_ms, 250);
        assert!(config.storage.db_path.ends_with("goalie/goalie.db"));
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_load_explicit_path_with_partial_yaml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("goalie.yml");
        fs::write(
            &path,
            "log-level: debug\nstorage:\n  db-path: /tmp/g.db\nday:\n  start-hour: 5\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.storage.db_path, PathBuf::from("/tmp/g.db"));
        assert_eq!(config.day.boundary().start_hour(), 5);
        assert_eq!(config.tui.tick_rate_ms, 250);
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("absent.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.yml");
        fs::write(&path, "day: [not, a, map]").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
