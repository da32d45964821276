//! Runtime configuration for catalog callers.
//!
//! # Responsibility
//! - Resolve database, logging and diagnostics locations from environment
//!   variables.
//! - Normalize values once so downstream code never re-validates them.
//!
//! # Invariants
//! - `log_level` is always one of `trace|debug|info|warn|error`.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "CATALOG_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "CATALOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CATALOG_LOG_DIR";
pub const ENV_DIAGNOSTICS_PATH: &str = "CATALOG_DIAGNOSTICS_PATH";

const DEFAULT_DB_FILE_NAME: &str = "catalog.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(String),
    EmptyValue(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::RelativeLogDir(value) => {
                write!(f, "{ENV_LOG_DIR} must be an absolute path, got `{value}`")
            }
            Self::EmptyValue(key) => write!(f, "{key} is set but empty"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// Normalized log level.
    pub log_level: &'static str,
    /// Directory for rolling log files; file logging is off when `None`.
    pub log_dir: Option<PathBuf>,
    /// File receiving validation diagnostics; diagnostics only go to the
    /// log when `None`.
    pub diagnostics_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            diagnostics_path: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = non_empty(&lookup, ENV_DB_PATH)? {
            config.db_path = PathBuf::from(value);
        }
        if let Some(value) = non_empty(&lookup, ENV_LOG_LEVEL)? {
            config.log_level = normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?;
        }
        if let Some(value) = non_empty(&lookup, ENV_LOG_DIR)? {
            if !Path::new(&value).is_absolute() {
                return Err(ConfigError::RelativeLogDir(value));
            }
            config.log_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = non_empty(&lookup, ENV_DIAGNOSTICS_PATH)? {
            config.diagnostics_path = Some(PathBuf::from(value));
        }

        Ok(config)
    }
}

fn non_empty<F>(lookup: &F, key: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue(key)),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}
