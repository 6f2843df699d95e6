//! Per-notebook exclusive access.
//!
//! Each notebook, identified by its derived filename, gets one in-process
//! mutex created on demand and dropped once nobody holds or waits for it. While
//! the mutex is held, an advisory `fs2` lock on a sidecar file in `.locks/`
//! also excludes other processes working on the same directory. Different
//! notebooks never contend.
//!
//! A sidecar is removed, while still locked, when its notebook file no longer
//! exists on release. A waiter that then wins the lock on the unlinked file
//! notices the path no longer names that file and starts over on a fresh one.

use crate::constants::{LOCKS_DIR_NAME, LOCK_FILE_EXTENSION, NOTEBOOK_FILE_EXTENSION};
use crate::errors::{AppResult, LockError};
use crate::persist::ensure_private_dir;
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Registry of notebook locks for one notebooks directory.
#[derive(Debug)]
pub struct LockRegistry {
    notebooks_dir: PathBuf,
    locks_dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    /// Creates a registry whose sidecar lock files live under `notebooks_dir/.locks`.
    pub fn new(notebooks_dir: &Path) -> Self {
        Self {
            notebooks_dir: notebooks_dir.to_path_buf(),
            locks_dir: notebooks_dir.join(LOCKS_DIR_NAME),
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn handle(&self, file_stem: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(file_stem.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Forgets the mutex for `file_stem` if `handle` and the map hold the only references.
    fn release_handle(&self, file_stem: &str, handle: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Clones are only made under the map lock, so the count cannot grow here.
        if Arc::strong_count(&handle) == 2 {
            locks.remove(file_stem);
        }
    }

    /// Number of notebooks with a live in-process mutex.
    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Runs `f` while holding exclusive access to the notebook `file_stem`.
    pub fn with_lock<T>(&self, file_stem: &str, f: impl FnOnce() -> AppResult<T>) -> AppResult<T> {
        let handle = self.handle(file_stem);
        let result = self.run_locked(file_stem, &handle, f);
        self.release_handle(file_stem, handle);
        result
    }

    fn run_locked<T>(
        &self,
        file_stem: &str,
        handle: &Mutex<()>,
        f: impl FnOnce() -> AppResult<T>,
    ) -> AppResult<T> {
        // The mutex guards no data, so a panic in another holder leaves nothing inconsistent.
        let _guard = handle.lock().unwrap_or_else(PoisonError::into_inner);
        let file_lock = self.lock_file(file_stem)?;
        debug!("Acquired lock for notebook file '{}'", file_stem);

        let result = f();

        let notebook_path = self
            .notebooks_dir
            .join(format!("{}{}", file_stem, NOTEBOOK_FILE_EXTENSION));
        if !notebook_path.exists() {
            file_lock.unlink();
        }
        result
    }

    /// Runs `f` while holding exclusive access to two notebooks.
    ///
    /// Locks are taken in lexical order so concurrent pairs cannot deadlock. If
    /// both stems are the same, the lock is taken once.
    pub fn with_pair_locked<T>(
        &self,
        first: &str,
        second: &str,
        f: impl FnOnce() -> AppResult<T>,
    ) -> AppResult<T> {
        if first == second {
            return self.with_lock(first, f);
        }
        let (low, high) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        self.with_lock(low, || self.with_lock(high, f))
    }

    fn lock_file(&self, file_stem: &str) -> AppResult<FileLock> {
        let path = self
            .locks_dir
            .join(format!("{}{}", file_stem, LOCK_FILE_EXTENSION));

        loop {
            ensure_private_dir(&self.locks_dir)?;

            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&path)
                .map_err(|source| LockError::AcquisitionFailed {
                    path: path.clone(),
                    source,
                })?;
            file.lock_exclusive()
                .map_err(|source| LockError::AcquisitionFailed {
                    path: path.clone(),
                    source,
                })?;

            let lock = FileLock {
                file,
                path: path.clone(),
            };
            if lock.is_current()? {
                return Ok(lock);
            }
            debug!("Lock file {} was removed while waiting, retrying", lock.path.display());
        }
    }
}

/// Releases the advisory lock when dropped.
struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Whether the locked file is still the one named by `path`.
    #[cfg(unix)]
    fn is_current(&self) -> AppResult<bool> {
        use std::io;
        use std::os::unix::fs::MetadataExt;

        let held = self.file.metadata()?;
        match fs::metadata(&self.path) {
            Ok(named) => Ok(held.dev() == named.dev() && held.ino() == named.ino()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(LockError::AcquisitionFailed {
                path: self.path.clone(),
                source: e,
            }
            .into()),
        }
    }

    // Open files cannot be unlinked here, so the path always names the held file.
    #[cfg(not(unix))]
    fn is_current(&self) -> AppResult<bool> {
        Ok(true)
    }

    /// Removes the sidecar while the lock is still held.
    fn unlink(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed lock file {}", self.path.display()),
            Err(e) => debug!("Failed to remove lock file {}: {}", self.path.display(), e),
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            debug!("Failed to release advisory notebook lock: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_same_notebook_is_mutually_exclusive() {
        let dir = tempdir().unwrap();
        let registry = Arc::new(LockRegistry::new(dir.path()));
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let inside = Arc::clone(&inside);
                let max_inside = Arc::clone(&max_inside);
                thread::spawn(move || {
                    registry
                        .with_lock("Diary", || {
                            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                            max_inside.fetch_max(now, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(5));
                            inside.fetch_sub(1, Ordering::SeqCst);
                            Ok(())
                        })
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pair_lock_with_identical_stems_does_not_deadlock() {
        let dir = tempdir().unwrap();
        let registry = LockRegistry::new(dir.path());
        let value = registry.with_pair_locked("Diary", "Diary", || Ok(7)).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_lock_files_live_in_hidden_subdirectory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Diary.eno"), "{}").unwrap();
        let registry = LockRegistry::new(dir.path());
        registry.with_lock("Diary", || Ok(())).unwrap();
        assert!(dir.path().join(".locks").join("Diary.lock").exists());
    }

    #[test]
    fn test_lock_file_is_removed_when_notebook_is_absent() {
        let dir = tempdir().unwrap();
        let registry = LockRegistry::new(dir.path());

        registry.with_lock("Missing", || Ok(())).unwrap();

        assert!(!dir.path().join(".locks").join("Missing.lock").exists());
    }

    #[test]
    fn test_lock_file_is_removed_after_notebook_is_deleted() {
        let dir = tempdir().unwrap();
        let notebook = dir.path().join("Diary.eno");
        fs::write(&notebook, "{}").unwrap();
        let registry = LockRegistry::new(dir.path());

        registry
            .with_lock("Diary", || {
                fs::remove_file(&notebook)?;
                Ok(())
            })
            .unwrap();

        assert!(!dir.path().join(".locks").join("Diary.lock").exists());
    }

    #[test]
    fn test_registry_forgets_released_mutexes() {
        let dir = tempdir().unwrap();
        let registry = LockRegistry::new(dir.path());

        for i in 0..10 {
            registry.with_lock(&format!("nb-{}", i), || Ok(())).unwrap();
        }
        registry.with_pair_locked("a", "b", || Ok(())).unwrap();
        let _ = registry.with_lock("failing", || -> AppResult<()> {
            Err(crate::errors::NotebookError::WrongKey.into())
        });

        assert_eq!(registry.tracked(), 0);
    }

    #[test]
    fn test_separate_registries_stay_exclusive_while_lock_files_churn() {
        // Two registries share only the file locks, like two processes. The
        // notebook file never exists, so every release unlinks the sidecar.
        let dir = tempdir().unwrap();
        let registries = [
            Arc::new(LockRegistry::new(dir.path())),
            Arc::new(LockRegistry::new(dir.path())),
        ];
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registries[i % 2]);
                let inside = Arc::clone(&inside);
                let max_inside = Arc::clone(&max_inside);
                thread::spawn(move || {
                    for _ in 0..10 {
                        registry
                            .with_lock("Churn", || {
                                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                                max_inside.fetch_max(now, Ordering::SeqCst);
                                thread::sleep(Duration::from_millis(1));
                                inside.fetch_sub(1, Ordering::SeqCst);
                                Ok(())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert!(!dir.path().join(".locks").join("Churn.lock").exists());
    }
}
