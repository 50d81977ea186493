//! Runtime configuration for a calendar session.
//!
//! # Responsibility
//! - Resolve where the local store and rolling logs live.
//! - Normalize the log level before logging starts.
//!
//! # Invariants
//! - `data_dir` is always absolute.
//! - The core never reads environment variables; callers pass overrides.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// SQLite file holding the key-value store.
pub const DB_FILE_NAME: &str = "calendar.sqlite3";
const APP_DIR_NAME: &str = "calendar";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    /// The platform exposes no per-user data directory.
    NoDataDir,
    RelativeDataDir(PathBuf),
    Logging(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(f, "could not determine a data directory"),
            Self::RelativeDataDir(path) => write!(
                f,
                "data directory must be an absolute path, got `{}`",
                path.display()
            ),
            Self::Logging(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

/// Resolved session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarConfig {
    pub data_dir: PathBuf,
    pub log_level: &'static str,
}

impl CalendarConfig {
    /// Resolves configuration from optional overrides.
    ///
    /// - `data_dir`: absolute directory; defaults to `<user data dir>/calendar`.
    /// - `log_level`: defaults to [`default_log_level`].
    pub fn resolve(data_dir: Option<&Path>, log_level: Option<&str>) -> Result<Self, ConfigError> {
        let data_dir = match data_dir {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => return Err(ConfigError::RelativeDataDir(path.to_path_buf())),
            None => default_data_dir()?,
        };
        let log_level = match log_level {
            Some(level) => normalize_level(level)?,
            None => default_log_level(),
        };

        Ok(Self {
            data_dir,
            log_level,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(ConfigError::NoDataDir)
}

#[cfg(test)]
mod tests {
    use super::{CalendarConfig, ConfigError, DB_FILE_NAME};
    use std::path::Path;

    #[test]
    fn explicit_overrides_are_used() {
        let dir = tempfile::tempdir().unwrap();
        let config = CalendarConfig::resolve(Some(dir.path()), Some("Warning")).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.db_path(), dir.path().join(DB_FILE_NAME));
        assert!(config.log_dir().starts_with(dir.path()));
    }

    #[test]
    fn relative_data_dir_is_rejected() {
        let err = CalendarConfig::resolve(Some(Path::new("data")), None).unwrap_err();
        assert!(matches!(err, ConfigError::RelativeDataDir(_)));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = CalendarConfig::resolve(Some(dir.path()), Some("loud")).unwrap_err();
        assert!(matches!(err, ConfigError::Logging(_)));
    }
}
