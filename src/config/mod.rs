//! Configuration management for eno.
//!
//! Configuration is loaded from environment variables with sensible defaults.
//! It decides where notebooks and settings live and how log output is shaped.
//!
//! # Environment Variables
//!
//! - `ENO_DIR`: Data directory (defaults to `~/.eno`). Notebooks are stored in
//!   `<dir>/notebooks` and settings in `<dir>/settings.json`.
//! - `ENO_LOG_FORMAT`: `text` (default) or `json`
//! - `ENO_LOG_LEVEL`: Default tracing level when `RUST_LOG` is unset (defaults to `info`)
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    DEFAULT_DATA_SUBDIR, DEFAULT_LOG_LEVEL, ENV_VAR_ENO_DIR, ENV_VAR_ENO_LOG_FORMAT,
    ENV_VAR_ENO_LOG_LEVEL, ENV_VAR_HOME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT, NOTEBOOKS_DIR_NAME,
    REDACTED_PLACEHOLDER, SETTINGS_FILE_NAME,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Runtime configuration for eno.
///
/// # Examples
///
/// ```
/// use eno::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/srv/eno"),
///     log_format: "text".to_string(),
///     log_level: "info".to_string(),
/// };
/// assert_eq!(config.notebooks_dir(), PathBuf::from("/srv/eno/notebooks"));
/// assert!(config.validate().is_ok());
/// ```
pub struct Config {
    /// Root directory holding the notebooks directory and the settings file.
    pub data_dir: PathBuf,

    /// Log output format, `text` or `json`.
    pub log_format: String,

    /// Default log level used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &REDACTED_PLACEHOLDER)
            .field("log_format", &self.log_format)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::new(),
            log_format: LOG_FORMAT_TEXT.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// The data directory path is expanded with `shellexpand`, so `~` and
    /// `$VARS` are honoured.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if path expansion fails or the expanded
    /// path is empty.
    pub fn load() -> AppResult<Self> {
        let data_dir_str = env::var(ENV_VAR_ENO_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        let expanded = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let data_dir = PathBuf::from(expanded.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let log_format = env::var(ENV_VAR_ENO_LOG_FORMAT)
            .map(|f| f.to_lowercase())
            .unwrap_or_else(|_| LOG_FORMAT_TEXT.to_string());
        let log_level =
            env::var(ENV_VAR_ENO_LOG_LEVEL).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        Ok(Config {
            data_dir,
            log_format,
            log_level,
        })
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the data directory is empty or relative,
    /// or if the log format is not `text` or `json`.
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        if self.log_format != LOG_FORMAT_TEXT && self.log_format != LOG_FORMAT_JSON {
            return Err(AppError::Config(format!(
                "Unsupported log format '{}', expected '{}' or '{}'",
                self.log_format, LOG_FORMAT_TEXT, LOG_FORMAT_JSON
            )));
        }

        Ok(())
    }

    /// Directory holding the `.eno` notebook files.
    pub fn notebooks_dir(&self) -> PathBuf {
        self.data_dir.join(NOTEBOOKS_DIR_NAME)
    }

    /// Location of the settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE_NAME)
    }
}
