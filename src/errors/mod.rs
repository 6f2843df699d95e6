//! Error handling utilities for the eno notebook store.
//!
//! This module provides the central error type `AppError`, which represents all
//! possible error conditions that might occur in the store, the convenience type
//! alias `AppResult`, and `ErrorKind`, the coarse classification callers use to
//! decide how a failure is presented.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Message shown to callers for any failure whose detail belongs in the logs only.
pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "an unexpected error occurred, check the logs for more details";

/// Coarse classification of every failure the store can report.
///
/// # Examples
///
/// ```
/// use eno::errors::{AppError, ErrorKind, NotebookError};
///
/// let error: AppError = NotebookError::WrongKey.into();
/// assert_eq!(error.kind(), ErrorKind::WrongKey);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A length or format policy was violated. User-correctable.
    Validation,
    /// The notebook or entry does not exist.
    NotFound,
    /// A notebook with the same derived filename already exists.
    AlreadyExists,
    /// An entry with the same name already exists in the notebook.
    DuplicateEntry,
    /// Authentication of the ciphertext failed.
    WrongKey,
    /// The regular expression query could not be compiled.
    InvalidQuery,
    /// Disk, permission, serialization or other internal failure.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::DuplicateEntry => "duplicate_entry",
            ErrorKind::WrongKey => "wrong_key",
            ErrorKind::InvalidQuery => "invalid_query",
            ErrorKind::Io => "io",
        };
        f.write_str(label)
    }
}

/// Represents the domain failures of notebook and entry operations.
///
/// These are the user-facing outcomes: their messages are safe to show to the
/// caller as-is.
///
/// # Examples
///
/// ```
/// use eno::errors::NotebookError;
///
/// let error = NotebookError::DuplicateEntry("Todo".to_string());
/// assert!(format!("{}", error).contains("Todo"));
/// ```
#[derive(Debug, Error)]
pub enum NotebookError {
    /// A length or format policy violation.
    #[error("{0}")]
    Validation(String),

    /// The notebook file does not exist.
    #[error("the specified notebook does not exist")]
    NotFound(String),

    /// The entry does not exist in the notebook.
    #[error("the specified entry does not exist: {0}")]
    EntryNotFound(String),

    /// Another notebook already owns the derived filename.
    #[error("the specified notebook name is too similar to the name of another notebook")]
    AlreadyExists(String),

    /// Another entry already uses the name.
    #[error("an entry with the name '{0}' already exists")]
    DuplicateEntry(String),

    /// The key did not authenticate the notebook content.
    ///
    /// A wrong key and a corrupted ciphertext are deliberately indistinguishable.
    #[error("incorrect notebook key")]
    WrongKey,

    /// The search query is not a valid regular expression.
    #[error("invalid search query: {0}")]
    InvalidQuery(#[source] regex::Error),
}

/// Represents specific error cases that can occur during cryptographic operations.
///
/// # Examples
///
/// ```
/// use eno::errors::CryptoError;
///
/// let error = CryptoError::AuthenticationFailed;
/// assert!(format!("{}", error).contains("authentication"));
/// ```
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The sealed blob is shorter than a nonce plus tag.
    #[error("sealed content is truncated: {actual} bytes, need at least {expected}")]
    Truncated {
        /// Minimum number of bytes required
        expected: usize,
        /// Number of bytes present
        actual: usize,
    },

    /// The authentication tag did not verify.
    #[error("authentication failed (wrong key or tampered data)")]
    AuthenticationFailed,

    /// The cipher refused to encrypt the payload.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Represents errors that can occur when acquiring exclusive access to a notebook.
///
/// # Examples
///
/// ```
/// use eno::errors::LockError;
/// use std::path::PathBuf;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::PermissionDenied, "permission denied");
/// let error = LockError::AcquisitionFailed {
///     path: PathBuf::from("/data/notebooks/.locks/Diary.lock"),
///     source: io_error,
/// };
///
/// assert!(format!("{}", error).contains("Failed to acquire lock"));
/// ```
#[derive(Debug, Error)]
pub enum LockError {
    /// Error when acquiring the advisory file lock fails for a technical reason.
    #[error("Failed to acquire lock for notebook file {path}: {source}. Please check file permissions and ensure the directory is accessible.")]
    AcquisitionFailed {
        /// The path to the lock file that couldn't be locked
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in eno.
///
/// This enum is the central error type used across the crate, with variants for
/// different error categories. Callers should branch on [`AppError::kind`] and
/// display [`AppError::user_message`]; the `Display` output carries internal
/// detail intended for logs.
///
/// # Examples
///
/// Converting from an IO error:
/// ```
/// use eno::errors::{AppError, ErrorKind};
/// use std::io;
///
/// let app_error: AppError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
/// assert_eq!(app_error.kind(), ErrorKind::Io);
/// assert!(!app_error.user_message().contains("gone"));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A notebook file or the settings file could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Domain failures of notebook and entry operations.
    #[error(transparent)]
    Notebook(#[from] NotebookError),

    /// Errors related to cryptographic operations.
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// Errors related to notebook locking.
    #[error("Notebook locking error: {0}")]
    Lock(#[from] LockError),
}

impl AppError {
    /// Classifies this error into one of the caller-facing kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Notebook(inner) => match inner {
                NotebookError::Validation(_) => ErrorKind::Validation,
                NotebookError::NotFound(_) | NotebookError::EntryNotFound(_) => {
                    ErrorKind::NotFound
                }
                NotebookError::AlreadyExists(_) => ErrorKind::AlreadyExists,
                NotebookError::DuplicateEntry(_) => ErrorKind::DuplicateEntry,
                NotebookError::WrongKey => ErrorKind::WrongKey,
                NotebookError::InvalidQuery(_) => ErrorKind::InvalidQuery,
            },
            AppError::Crypto(CryptoError::AuthenticationFailed)
            | AppError::Crypto(CryptoError::Truncated { .. }) => ErrorKind::WrongKey,
            AppError::Config(_) => ErrorKind::Validation,
            AppError::Crypto(CryptoError::EncryptionFailed(_))
            | AppError::Io(_)
            | AppError::Serialization(_)
            | AppError::Lock(_) => ErrorKind::Io,
        }
    }

    /// The message that is safe to show to the caller.
    ///
    /// Internal failures never leak paths or OS detail; those are logged where
    /// they occur.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Io => UNEXPECTED_ERROR_MESSAGE.to_string(),
            ErrorKind::WrongKey => NotebookError::WrongKey.to_string(),
            _ => self.to_string(),
        }
    }
}

/// Builds a validation error for a value whose length is out of bounds.
pub(crate) fn length_error(field: &str, min: usize, max: usize) -> AppError {
    NotebookError::Validation(format!(
        "{} must be between {} and {} characters in length",
        field, min, max
    ))
    .into()
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use eno::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Config("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
