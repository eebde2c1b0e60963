//! Runtime configuration for storage locations and logging.
//!
//! # Responsibility
//! - Resolve where the database, session file and logs live on-device.
//! - Apply environment overrides (`TODO_DATA_DIR`, `TODO_LOG_LEVEL`).
//!
//! # Invariants
//! - `data_dir` is always absolute.
//! - Blank environment values are ignored, not treated as overrides.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "TODO_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "TODO_LOG_LEVEL";

const DEFAULT_DIR_NAME: &str = "todo";
const DEFAULT_DB_FILE_NAME: &str = "todo.sqlite3";
const DEFAULT_SESSION_FILE_NAME: &str = "session.json";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    RelativeDataDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeDataDir(path) => write!(
                f,
                "data directory must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Storage and logging configuration for one app process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub session_file_name: String,
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: std::env::temp_dir().join(DEFAULT_DIR_NAME),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            session_file_name: DEFAULT_SESSION_FILE_NAME.to_string(),
            log_level: default_log_level().to_string(),
        }
    }
}

impl CoreConfig {
    /// Builds a config rooted at `data_dir` with default file names.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = data_dir.into();
        if !data_dir.is_absolute() {
            return Err(ConfigError::RelativeDataDir(data_dir));
        }
        Ok(Self {
            data_dir,
            ..Self::default()
        })
    }

    /// Defaults overlaid with process environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match non_blank(lookup(DATA_DIR_ENV)) {
            Some(dir) => Self::with_data_dir(dir)?,
            None => Self::default(),
        };
        if let Some(level) = non_blank(lookup(LOG_LEVEL_ENV)) {
            config.log_level = level;
        }
        Ok(config)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(&self.session_file_name)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DATA_DIR_ENV, LOG_LEVEL_ENV};
    use std::path::PathBuf;

    #[test]
    fn lookup_overrides_data_dir_and_level() {
        let base = std::env::temp_dir().join("todo-config-test");
        let base_text = base.to_string_lossy().to_string();
        let config = CoreConfig::from_lookup(|key| match key {
            DATA_DIR_ENV => Some(format!("  {base_text} ")),
            LOG_LEVEL_ENV => Some("warn".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.data_dir, base);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.db_path(), base.join("todo.sqlite3"));
        assert_eq!(config.session_path(), base.join("session.json"));
        assert_eq!(config.log_dir(), base.join("logs"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = CoreConfig::from_lookup(|_| Some("   ".to_string())).unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn relative_data_dir_is_rejected() {
        let err = CoreConfig::from_lookup(|key| {
            (key == DATA_DIR_ENV).then(|| "relative/dir".to_string())
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::RelativeDataDir(PathBuf::from("relative/dir")));
    }
}
