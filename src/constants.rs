//! Constants used throughout the application.
//!
//! This module contains all constants used in eno, organized into logical
//! groups. Having constants centralized makes them easier to find, modify,
//! and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "eno";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "An encrypted, file-backed notebook store";

// Logging Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the eno data directory.
pub const ENV_VAR_ENO_DIR: &str = "ENO_DIR";
/// Environment variable selecting the log output format.
pub const ENV_VAR_ENO_LOG_FORMAT: &str = "ENO_LOG_FORMAT";
/// Environment variable selecting the default log level.
pub const ENV_VAR_ENO_LOG_LEVEL: &str = "ENO_LOG_LEVEL";
/// Environment variable holding the notebook passphrase for non-interactive use.
pub const ENV_VAR_ENO_PASSPHRASE: &str = "ENO_PASSPHRASE";
/// Environment variable holding the replacement passphrase for `notebook rekey`.
pub const ENV_VAR_ENO_NEW_PASSPHRASE: &str = "ENO_NEW_PASSPHRASE";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default data directory relative to the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".eno";
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// File System Parameters
/// Sub-directory of the data directory holding notebook files.
pub const NOTEBOOKS_DIR_NAME: &str = "notebooks";
/// File extension for notebook files.
pub const NOTEBOOK_FILE_EXTENSION: &str = ".eno";
/// Sub-directory of the notebooks directory holding advisory lock files.
pub const LOCKS_DIR_NAME: &str = ".locks";
/// File extension for advisory lock files.
pub const LOCK_FILE_EXTENSION: &str = ".lock";
/// Name of the settings file inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Validation
/// Notebook name length bounds, in characters.
pub const NOTEBOOK_NAME_MIN_LENGTH: usize = 1;
pub const NOTEBOOK_NAME_MAX_LENGTH: usize = 64;
/// Notebook description length bounds, in characters.
pub const NOTEBOOK_DESCRIPTION_MIN_LENGTH: usize = 0;
pub const NOTEBOOK_DESCRIPTION_MAX_LENGTH: usize = 256;
/// Notebook passphrase length bounds, in characters.
pub const NOTEBOOK_KEY_MIN_LENGTH: usize = 8;
pub const NOTEBOOK_KEY_MAX_LENGTH: usize = 256;
/// Entry name length bounds, in characters.
pub const ENTRY_NAME_MIN_LENGTH: usize = 1;
pub const ENTRY_NAME_MAX_LENGTH: usize = 256;
/// Entry content length bounds, in characters.
pub const ENTRY_CONTENT_MIN_LENGTH: usize = 0;
pub const ENTRY_CONTENT_MAX_LENGTH: usize = 65536;
/// Search query length bounds, in characters.
pub const SEARCH_QUERY_MIN_LENGTH: usize = 0;
pub const SEARCH_QUERY_MAX_LENGTH: usize = 1024;
/// Settings key length bounds, in characters.
pub const SETTINGS_KEY_MIN_LENGTH: usize = 1;
pub const SETTINGS_KEY_MAX_LENGTH: usize = 256;

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "eno";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
