//! Notebook file lifecycle.
//!
//! `NotebookStore` owns one directory holding one `.eno` file per notebook. Each
//! operation re-reads the file from disk, decrypts only when it needs the
//! entries, and persists through an atomic write. Nothing is cached between
//! operations.
//!
//! Operations touching one notebook are serialised by a per-notebook lock held
//! for the whole read-decrypt-mutate-encrypt-write span. `list` takes no lock.
//!
//! # Example
//!
//! ```no_run
//! use eno::store::NotebookStore;
//!
//! let store = NotebookStore::open_dir("/home/me/.eno/notebooks")?;
//! store.create("Diary", "Daily notes", "correct horse battery staple")?;
//! let notebook = store.open("Diary", "correct horse battery staple")?;
//! assert!(notebook.entries.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod locks;

use crate::constants::NOTEBOOK_FILE_EXTENSION;
use crate::crypto::derive_key;
use crate::envelope::{EncryptedNotebook, Notebook, NotebookDetails};
use crate::errors::{AppError, AppResult, NotebookError};
use crate::persist::{create_atomic, ensure_private_dir, remove_durable, write_atomic};
use crate::validation;
use locks::LockRegistry;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span, Span};
use uuid::Uuid;

/// Derives the filename stem for a notebook name.
///
/// Every run of characters outside `[A-Za-z0-9_-]` (spaces included) collapses
/// to a single `-`, and leading or trailing `-` are trimmed. Names that differ
/// only in stripped characters therefore share a file.
///
/// # Examples
///
/// ```
/// use eno::store::derive_file_stem;
///
/// assert_eq!(derive_file_stem("My Notebook"), "My-Notebook");
/// assert_eq!(derive_file_stem("My  Notebook!"), "My-Notebook");
/// assert_eq!(derive_file_stem("work_log-2024"), "work_log-2024");
/// ```
pub fn derive_file_stem(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut in_run = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            stem.push(ch);
            in_run = false;
        } else if !in_run {
            stem.push('-');
            in_run = true;
        }
    }

    stem.trim_matches('-').to_string()
}

/// Creates the span every public store and entry operation runs in.
pub(crate) fn operation_span(operation: &'static str, notebook: &str) -> Span {
    info_span!(
        "notebook_operation",
        op = operation,
        op_id = %Uuid::new_v4(),
        notebook = %notebook
    )
}

/// Logs the full detail of an internal failure and passes it on.
fn log_failure(action: &str, path: &Path, error: AppError) -> AppError {
    error!(path = %path.display(), error = %error, "Failed to {}", action);
    error
}

/// File-backed store of encrypted notebooks.
#[derive(Debug)]
pub struct NotebookStore {
    dir: PathBuf,
    locks: LockRegistry,
}

impl NotebookStore {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the directory cannot be created.
    pub fn open_dir(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        ensure_private_dir(&dir)?;
        debug!("Notebook store opened at {}", dir.display());

        Ok(Self {
            locks: LockRegistry::new(&dir),
            dir,
        })
    }

    /// The directory holding the notebook files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the derived stem and full path of the file for `name`.
    fn locate(&self, name: &str) -> AppResult<(String, PathBuf)> {
        let stem = derive_file_stem(name);
        if stem.is_empty() {
            return Err(NotebookError::Validation(
                "notebook name must contain at least one letter, digit, '-' or '_'".to_string(),
            )
            .into());
        }
        let path = self
            .dir
            .join(format!("{}{}", stem, NOTEBOOK_FILE_EXTENSION));
        Ok((stem, path))
    }

    /// Fails with `NotFound` when no file exists for `name`.
    ///
    /// Checked before a lock is taken so lookups of absent notebooks leave no
    /// lock files behind. The read under the lock checks again.
    fn require_exists(&self, name: &str, path: &Path) -> AppResult<()> {
        if path.exists() {
            return Ok(());
        }
        Err(NotebookError::NotFound(name.to_string()).into())
    }

    fn read_envelope(&self, name: &str, path: &Path) -> AppResult<EncryptedNotebook> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(NotebookError::NotFound(name.to_string()).into());
            }
            Err(e) => return Err(log_failure("read notebook file", path, e.into())),
        };

        EncryptedNotebook::from_json(&bytes)
            .map_err(|e| log_failure("parse notebook file", path, e))
    }

    fn write_envelope(&self, path: &Path, notebook: &EncryptedNotebook) -> AppResult<()> {
        let bytes = notebook.to_json()?;
        write_atomic(path, &bytes).map_err(|e| log_failure("write notebook file", path, e))
    }

    /// Creates a new, empty notebook sealed under `passphrase`.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name, description or passphrase length is out of bounds
    /// - `AlreadyExists` if a notebook with the same derived filename exists
    /// - `Io` if the file cannot be written
    pub fn create(&self, name: &str, description: &str, passphrase: &str) -> AppResult<Notebook> {
        let span = operation_span("create", name);
        let _enter = span.enter();

        validation::notebook_name(name)?;
        validation::notebook_description(description)?;
        validation::notebook_key(passphrase)?;
        let (stem, path) = self.locate(name)?;

        self.locks.with_lock(&stem, || {
            if path.exists() {
                return Err(NotebookError::AlreadyExists(name.to_string()).into());
            }

            let notebook = Notebook::new(name, description);
            let sealed = notebook.seal(&derive_key(passphrase))?;

            match create_atomic(&path, &sealed.to_json()?) {
                Ok(()) => {}
                Err(AppError::Io(e)) if e.kind() == io::ErrorKind::AlreadyExists => {
                    return Err(NotebookError::AlreadyExists(name.to_string()).into());
                }
                Err(e) => return Err(log_failure("create notebook file", &path, e)),
            }

            info!("Created notebook file {}", path.display());
            Ok(notebook)
        })
    }

    /// Lists every notebook in the directory in its encrypted form.
    ///
    /// No key is needed. Files are returned in filename order. A file removed
    /// between the directory scan and its read is left out. Any other file that
    /// cannot be read or parsed fails the whole listing rather than being
    /// skipped.
    pub fn list(&self) -> AppResult<Vec<EncryptedNotebook>> {
        let span = operation_span("list", "*");
        let _enter = span.enter();

        let read_dir = fs::read_dir(&self.dir)
            .map_err(|e| log_failure("list notebooks directory", &self.dir, e.into()))?;

        let mut paths = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry
                .map_err(|e| log_failure("list notebooks directory", &self.dir, e.into()))?;
            let file_type = match dir_entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(log_failure("inspect notebook file", &dir_entry.path(), e.into()))
                }
            };
            let is_notebook = dir_entry
                .file_name()
                .to_str()
                .is_some_and(|n| n.ends_with(NOTEBOOK_FILE_EXTENSION));

            if file_type.is_file() && is_notebook {
                paths.push(dir_entry.path());
            }
        }
        paths.sort();

        let mut notebooks = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                // Deleted or renamed away since the directory scan.
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Notebook file {} vanished during listing", path.display());
                    continue;
                }
                Err(e) => return Err(log_failure("read notebook file", &path, e.into())),
            };
            let notebook = EncryptedNotebook::from_json(&bytes)
                .map_err(|e| log_failure("parse notebook file", &path, e))?;
            notebooks.push(notebook);
        }

        debug!("Listed {} notebooks", notebooks.len());
        Ok(notebooks)
    }

    /// Returns the plaintext metadata of a notebook without decrypting it.
    pub fn details(&self, name: &str) -> AppResult<NotebookDetails> {
        let span = operation_span("details", name);
        let _enter = span.enter();

        validation::notebook_name(name)?;
        let (_, path) = self.locate(name)?;
        Ok(self.read_envelope(name, &path)?.details())
    }

    /// Reads and decrypts a notebook.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no file exists for the name
    /// - `WrongKey` if the passphrase does not authenticate the content
    pub fn open(&self, name: &str, passphrase: &str) -> AppResult<Notebook> {
        let span = operation_span("open", name);
        let _enter = span.enter();

        self.read_with(name, passphrase, Ok)
    }

    /// Renames a notebook, moving it to the file derived from `new_name`.
    ///
    /// Only plaintext metadata is touched, so no key is needed. The new file is
    /// fully persisted before the old one is removed.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if another notebook owns the new derived filename
    pub fn rename(&self, name: &str, new_name: &str) -> AppResult<EncryptedNotebook> {
        let span = operation_span("rename", name);
        let _enter = span.enter();

        validation::notebook_name(name)?;
        validation::notebook_name(new_name)?;
        let (old_stem, old_path) = self.locate(name)?;
        let (new_stem, new_path) = self.locate(new_name)?;
        self.require_exists(name, &old_path)?;

        self.locks.with_pair_locked(&old_stem, &new_stem, || {
            let mut notebook = self.read_envelope(name, &old_path)?;
            notebook.name = new_name.to_string();
            notebook.edit_time = Some(chrono::Utc::now());

            if old_stem == new_stem {
                self.write_envelope(&new_path, &notebook)?;
                info!("Renamed notebook in place at {}", new_path.display());
                return Ok(notebook);
            }

            match create_atomic(&new_path, &notebook.to_json()?) {
                Ok(()) => {}
                Err(AppError::Io(e)) if e.kind() == io::ErrorKind::AlreadyExists => {
                    return Err(NotebookError::AlreadyExists(new_name.to_string()).into());
                }
                Err(e) => return Err(log_failure("write renamed notebook file", &new_path, e)),
            }

            remove_durable(&old_path)
                .map_err(|e| log_failure("remove old notebook file", &old_path, e))?;

            info!(
                "Renamed notebook file {} to {}",
                old_path.display(),
                new_path.display()
            );
            Ok(notebook)
        })
    }

    /// Replaces a notebook's description. No key is needed.
    pub fn set_description(
        &self,
        name: &str,
        new_description: &str,
    ) -> AppResult<EncryptedNotebook> {
        let span = operation_span("set_description", name);
        let _enter = span.enter();

        validation::notebook_name(name)?;
        validation::notebook_description(new_description)?;
        let (stem, path) = self.locate(name)?;
        self.require_exists(name, &path)?;

        self.locks.with_lock(&stem, || {
            let mut notebook = self.read_envelope(name, &path)?;
            notebook.description = new_description.to_string();
            notebook.edit_time = Some(chrono::Utc::now());
            self.write_envelope(&path, &notebook)?;

            info!("Updated description of {}", path.display());
            Ok(notebook)
        })
    }

    /// Re-seals a notebook's content under a new passphrase.
    ///
    /// The old passphrase must authenticate first. The file is replaced
    /// atomically, so the old ciphertext stays valid until the new one is
    /// complete.
    pub fn rekey(&self, name: &str, passphrase: &str, new_passphrase: &str) -> AppResult<()> {
        let span = operation_span("rekey", name);
        let _enter = span.enter();

        validation::notebook_name(name)?;
        validation::notebook_key(passphrase)?;
        validation::notebook_key(new_passphrase)?;
        let (stem, path) = self.locate(name)?;
        self.require_exists(name, &path)?;

        self.locks.with_lock(&stem, || {
            let notebook = self.read_envelope(name, &path)?.open(&derive_key(passphrase))?;
            let resealed = notebook.seal(&derive_key(new_passphrase))?;
            self.write_envelope(&path, &resealed)?;

            info!("Changed key of {}", path.display());
            Ok(())
        })
    }

    /// Deletes a notebook file.
    ///
    /// The passphrase must authenticate the notebook as proof of possession.
    pub fn delete(&self, name: &str, passphrase: &str) -> AppResult<()> {
        let span = operation_span("delete", name);
        let _enter = span.enter();

        validation::notebook_name(name)?;
        validation::notebook_key(passphrase)?;
        let (stem, path) = self.locate(name)?;
        self.require_exists(name, &path)?;

        self.locks.with_lock(&stem, || {
            self.read_envelope(name, &path)?
                .open(&derive_key(passphrase))?;
            remove_durable(&path).map_err(|e| log_failure("delete notebook file", &path, e))?;

            info!("Deleted notebook file {}", path.display());
            Ok(())
        })
    }

    /// Opens a notebook under its lock and hands the decrypted form to `f`.
    ///
    /// Nothing is persisted.
    pub(crate) fn read_with<T>(
        &self,
        name: &str,
        passphrase: &str,
        f: impl FnOnce(Notebook) -> AppResult<T>,
    ) -> AppResult<T> {
        validation::notebook_name(name)?;
        validation::notebook_key(passphrase)?;
        let (stem, path) = self.locate(name)?;
        self.require_exists(name, &path)?;

        self.locks.with_lock(&stem, || {
            let notebook = self.read_envelope(name, &path)?.open(&derive_key(passphrase))?;
            f(notebook)
        })
    }

    /// Opens a notebook under its lock, lets `f` mutate it, then re-seals and
    /// persists the whole notebook with a bumped edit time.
    ///
    /// If `f` fails, nothing is written.
    pub(crate) fn update_with<T>(
        &self,
        name: &str,
        passphrase: &str,
        f: impl FnOnce(&mut Notebook) -> AppResult<T>,
    ) -> AppResult<T> {
        validation::notebook_name(name)?;
        validation::notebook_key(passphrase)?;
        let (stem, path) = self.locate(name)?;
        self.require_exists(name, &path)?;

        self.locks.with_lock(&stem, || {
            let key = derive_key(passphrase);
            let mut notebook = self.read_envelope(name, &path)?.open(&key)?;

            let result = f(&mut notebook)?;

            notebook.touch();
            self.write_envelope(&path, &notebook.seal(&key)?)?;
            debug!("Persisted notebook {}", path.display());
            Ok(result)
        })
    }
}
