//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Describe log level, optional log directory and storage backend.
//! - Resolve them from `TASKBOARD_*` environment variables.
//!
//! # Invariants
//! - Missing or blank variables fall back to defaults; they never fail.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "TASKBOARD_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKBOARD_LOG_DIR";
pub const ENV_DB_PATH: &str = "TASKBOARD_DB_PATH";

/// Storage backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Process-local collections, lost on exit.
    #[default]
    Memory,
    /// SQLite database file, created and migrated on open.
    Sqlite { path: PathBuf },
}

/// Core host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub log_level: String,
    /// File logging is disabled when `None`.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            storage: StorageConfig::Memory,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, one call per variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(path) = read(ENV_DB_PATH) {
            config.storage = StorageConfig::Sqlite {
                path: PathBuf::from(path),
            };
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, StorageConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = CoreConfig::from_lookup(lookup_in(&[]));
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.storage, StorageConfig::Memory);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn variables_override_defaults() {
        let config = CoreConfig::from_lookup(lookup_in(&[
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "/var/log/taskboard"),
            (ENV_DB_PATH, " /srv/taskboard.db "),
        ]));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/taskboard")));
        assert_eq!(
            config.storage,
            StorageConfig::Sqlite {
                path: PathBuf::from("/srv/taskboard.db")
            }
        );
    }

    #[test]
    fn blank_variables_are_ignored() {
        let config =
            CoreConfig::from_lookup(lookup_in(&[(ENV_LOG_LEVEL, "  "), (ENV_DB_PATH, "")]));
        assert_eq!(config, CoreConfig::default());
    }
}
