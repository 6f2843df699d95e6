//! All-or-nothing file persistence.
//!
//! Every file the store writes goes through [`write_atomic`]: the bytes are
//! written and synced to a temporary file in the destination directory, then
//! renamed over the target and the directory is synced. Readers see either the
//! old or the new content, never a truncated file.

use crate::errors::{AppError, AppResult};
use std::fs;
#[cfg(unix)]
use std::fs::Permissions;
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Ensures a directory exists, creating it with owner-only permissions if needed.
///
/// # Errors
///
/// Returns `AppError::Io` if the directory creation fails due to permission issues,
/// invalid paths, or other filesystem errors.
pub fn ensure_private_dir(dir: &Path) -> AppResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            AppError::Io(io::Error::new(
                e.kind(),
                format!("Failed to create directory {}: {}", dir.display(), e),
            ))
        })?;

        #[cfg(unix)]
        {
            let permissions = Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(dir, permissions)?;
            debug!("Set 0o700 permissions on {}", dir.display());
        }
    }
    Ok(())
}

/// Atomically replaces `path` with `bytes`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let temp = write_temp_sibling(path, bytes)?;
    temp.persist(path).map_err(|e| AppError::Io(e.error))?;
    sync_parent(path)
}

/// Atomically creates `path` with `bytes`, failing with `AlreadyExists` if it is present.
///
/// The existence check and the write are a single filesystem operation.
pub fn create_atomic(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let temp = write_temp_sibling(path, bytes)?;
    temp.persist_noclobber(path)
        .map_err(|e| AppError::Io(e.error))?;
    sync_parent(path)
}

/// Removes `path` and makes the removal durable.
pub fn remove_durable(path: &Path) -> AppResult<()> {
    fs::remove_file(path)?;
    sync_parent(path)
}

/// Flushes the directory entry changes made under `path`'s parent.
#[cfg(unix)]
fn sync_parent(path: &Path) -> AppResult<()> {
    if let Some(dir) = path.parent() {
        fs::File::open(dir)?.sync_all()?;
    }
    Ok(())
}

// Directories cannot be opened as files here; renames are flushed by the OS.
#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> AppResult<()> {
    Ok(())
}

fn write_temp_sibling(path: &Path, bytes: &[u8]) -> AppResult<NamedTempFile> {
    let dir = path.parent().ok_or_else(|| {
        AppError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no parent directory", path.display()),
        ))
    })?;

    let mut temp = tempfile::Builder::new()
        .prefix(".tmp-")
        .suffix(".partial")
        .tempfile_in(dir)?;

    #[cfg(unix)]
    {
        let permissions = Permissions::from_mode(crate::constants::DEFAULT_FILE_PERMISSIONS);
        temp.as_file().set_permissions(permissions)?;
    }

    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    Ok(temp)
}
