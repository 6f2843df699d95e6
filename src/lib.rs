/*!
# Eno

Eno is an encrypted, file-backed notebook store. Each notebook is a single JSON
file whose name, description and timestamps are readable in plaintext, while
its entries are sealed with AES-256-GCM under a key derived from the notebook's
passphrase.

## Architecture

- `crypto`: Key derivation and authenticated encryption of entry payloads
- `envelope`: The on-disk notebook record and the sealed entries payload
- `store`: Notebook file lifecycle, filename derivation and per-notebook locking
- `entries`: Entry operations and search inside one notebook
- `settings`: A flat, unencrypted key/value settings file
- `persist`: Atomic file writes
- `validation`: Length policy shared by every operation
- `config`: Configuration loading from the environment
- `logging`: Tracing subscriber setup
- `cli`: Command-line interface definition
- `errors`: Error types, kinds and user-facing messages

## Usage Example

```rust,no_run
use eno::entries;
use eno::store::NotebookStore;

fn main() -> eno::AppResult<()> {
    let config = eno::Config::load()?;
    let store = NotebookStore::open_dir(config.notebooks_dir())?;

    store.create("Diary", "Daily notes", "correct horse battery staple")?;
    entries::create_entry(&store, "Diary", "correct horse battery staple", "Monday")?;
    entries::set_entry_content(
        &store,
        "Diary",
        "correct horse battery staple",
        "Monday",
        "buy milk",
    )?;

    let hits = entries::search_entries(&store, "Diary", "correct horse battery staple", "milk", false)?;
    assert!(hits.contains_key("Monday"));
    Ok(())
}
```
*/

/// Command-line interface definition using clap
pub mod cli;
/// Configuration loading and validation
pub mod config;
/// Application-wide constants
pub mod constants;
/// Key derivation and authenticated encryption
pub mod crypto;
/// Entry operations within a notebook
pub mod entries;
/// On-disk notebook record and sealed payload
pub mod envelope;
/// Error types and utilities for error handling
pub mod errors;
/// Tracing subscriber setup
pub mod logging;
/// Atomic file persistence
pub mod persist;
/// Flat application settings
pub mod settings;
/// Notebook file store
pub mod store;
/// Length validation
pub mod validation;

// Re-export important types for convenience
pub use config::Config;
pub use envelope::{EncryptedNotebook, Entries, Entry, Notebook, NotebookDetails};
pub use errors::{AppError, AppResult, ErrorKind};
pub use settings::Settings;
pub use store::NotebookStore;
