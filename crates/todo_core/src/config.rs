//! Process configuration read from the environment.
//!
//! # Responsibility
//! - Resolve database path and logging settings for composition roots.
//!
//! # Invariants
//! - Blank environment values are treated as unset.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TODO_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TODO_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TODO_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "todo.sqlite3";

/// Settings shared by the FFI bridge and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logs.
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Builds configuration from `TODO_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let env: HashMap<&str, &str> = HashMap::from([(DB_PATH_ENV, "  "), (LOG_DIR_ENV, "")]);
        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn explicit_values_are_trimmed() {
        let env: HashMap<&str, &str> = HashMap::from([
            (DB_PATH_ENV, " /data/tasks.db "),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/var/log/todo"),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.db_path, PathBuf::from("/data/tasks.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/todo"));
    }
}
