//! Application settings.
//!
//! Settings are a flat, unencrypted JSON object persisted as a single file. The
//! file is created as `{}` the first time it is needed. Every call re-reads the
//! file, and writes go through the same atomic persistence as notebooks.

use crate::errors::{AppError, AppResult};
use crate::persist::{create_atomic, ensure_private_dir, write_atomic};
use crate::validation;
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, error, info};

/// A flat key/value map of settings.
pub type SettingsMap = Map<String, Value>;

/// File-backed settings store.
#[derive(Debug)]
pub struct Settings {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl Settings {
    /// Creates a settings store backed by `path`. Nothing is touched on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The settings file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_exists(&self) -> AppResult<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            ensure_private_dir(parent)?;
        }
        // No-clobber, so a racing first `set` is never overwritten by `{}`.
        match create_atomic(&self.path, b"{}") {
            Ok(()) => {
                info!("Created settings file {}", self.path.display());
                Ok(())
            }
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(self.log_failure("create settings file", e)),
        }
    }

    fn log_failure(&self, action: &str, error: AppError) -> AppError {
        error!(path = %self.path.display(), error = %error, "Failed to {}", action);
        error
    }

    fn read(&self) -> AppResult<SettingsMap> {
        self.ensure_exists()?;
        let bytes = fs::read(&self.path)
            .map_err(|e| self.log_failure("read settings file", e.into()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| self.log_failure("parse settings file", e.into()))
    }

    fn write(&self, settings: &SettingsMap) -> AppResult<()> {
        let bytes = serde_json::to_vec(settings)?;
        write_atomic(&self.path, &bytes).map_err(|e| self.log_failure("write settings file", e))
    }

    /// Returns all settings.
    pub fn all(&self) -> AppResult<SettingsMap> {
        self.read()
    }

    /// Returns one setting, or `None` if it is not set.
    pub fn get(&self, key: &str) -> AppResult<Option<Value>> {
        Ok(self.read()?.remove(key))
    }

    /// Sets `key` to an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if the key length is out of bounds.
    pub fn set(&self, key: &str, value: Value) -> AppResult<()> {
        validation::settings_key(key)?;

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut settings = self.read()?;
        settings.insert(key.to_string(), value);
        self.write(&settings)?;

        debug!("Set settings option '{}'", key);
        Ok(())
    }

    /// Removes `key`. Removing an absent key is not an error.
    pub fn delete(&self, key: &str) -> AppResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut settings = self.read()?;
        if settings.remove(key).is_some() {
            self.write(&settings)?;
            debug!("Deleted settings option '{}'", key);
        }
        Ok(())
    }
}
