#![allow(dead_code)]

use assert_cmd::Command;
use eno::store::NotebookStore;
use std::path::Path;
use tempfile::TempDir;

pub const TEST_PASSPHRASE: &str = "test-passphrase";
pub const OTHER_PASSPHRASE: &str = "another-test-passphrase";

/// Creates a store rooted in a fresh temporary directory.
///
/// The `TempDir` must be kept alive for as long as the store is used.
pub fn temp_store() -> (TempDir, NotebookStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = NotebookStore::open_dir(dir.path().join("notebooks")).expect("open store");
    (dir, store)
}

/// Creates a `Command` for the `eno` binary with a clean, non-interactive environment
/// pointed at `data_dir`.
pub fn base_eno_command(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("eno").expect("eno binary not built");
    configure_eno_command(&mut cmd, data_dir);
    cmd
}

/// Applies the standard non-interactive environment to an existing `Command`.
pub fn configure_eno_command(cmd: &mut Command, data_dir: &Path) {
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("ENO_DIR", data_dir)
        .env("ENO_PASSPHRASE", TEST_PASSPHRASE)
        .env("ENO_LOG_LEVEL", "warn");
}
