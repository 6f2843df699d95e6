//! Entry operations within one notebook.
//!
//! Every operation opens the notebook under its lock, works on the decrypted
//! entries map, and (for mutations) re-seals and persists the entire notebook.
//! Arguments are validated before the notebook file is touched.

pub mod search;

use crate::envelope::{Entries, Entry};
use crate::errors::{AppResult, NotebookError};
use crate::store::{operation_span, NotebookStore};
use crate::validation;
use search::SearchQuery;
use tracing::{debug, info};

/// Creates an empty entry named `entry_name`.
///
/// # Errors
///
/// - `Validation` if the entry name length is out of bounds
/// - `DuplicateEntry` if an entry with that name exists
pub fn create_entry(
    store: &NotebookStore,
    notebook: &str,
    passphrase: &str,
    entry_name: &str,
) -> AppResult<Entry> {
    let span = operation_span("create_entry", notebook);
    let _enter = span.enter();

    validation::entry_name(entry_name)?;

    store.update_with(notebook, passphrase, |nb| {
        if nb.entries.contains_key(entry_name) {
            return Err(NotebookError::DuplicateEntry(entry_name.to_string()).into());
        }

        let entry = Entry::new(entry_name);
        nb.entries.insert(entry_name.to_string(), entry.clone());
        info!("Created entry");
        Ok(entry)
    })
}

/// Returns every entry in the notebook.
pub fn list_entries(store: &NotebookStore, notebook: &str, passphrase: &str) -> AppResult<Entries> {
    let span = operation_span("list_entries", notebook);
    let _enter = span.enter();

    store.read_with(notebook, passphrase, |nb| Ok(nb.entries))
}

/// Returns a single entry.
///
/// # Errors
///
/// - `NotFound` if the entry does not exist
pub fn get_entry(
    store: &NotebookStore,
    notebook: &str,
    passphrase: &str,
    entry_name: &str,
) -> AppResult<Entry> {
    let span = operation_span("get_entry", notebook);
    let _enter = span.enter();

    validation::entry_name(entry_name)?;

    store.read_with(notebook, passphrase, |mut nb| {
        nb.entries
            .remove(entry_name)
            .ok_or_else(|| NotebookError::EntryNotFound(entry_name.to_string()).into())
    })
}

/// Renames an entry, keeping the map key and `Entry::name` in sync.
///
/// Renaming an entry to its own name only bumps its edit time.
///
/// # Errors
///
/// - `NotFound` if the source entry does not exist
/// - `DuplicateEntry` if another entry already uses `new_entry_name`
pub fn rename_entry(
    store: &NotebookStore,
    notebook: &str,
    passphrase: &str,
    entry_name: &str,
    new_entry_name: &str,
) -> AppResult<Entry> {
    let span = operation_span("rename_entry", notebook);
    let _enter = span.enter();

    validation::entry_name(entry_name)?;
    validation::entry_name(new_entry_name)?;

    store.update_with(notebook, passphrase, |nb| {
        if !nb.entries.contains_key(entry_name) {
            return Err(NotebookError::EntryNotFound(entry_name.to_string()).into());
        }
        if entry_name != new_entry_name && nb.entries.contains_key(new_entry_name) {
            return Err(NotebookError::DuplicateEntry(new_entry_name.to_string()).into());
        }

        let mut entry = nb
            .entries
            .remove(entry_name)
            .ok_or_else(|| NotebookError::EntryNotFound(entry_name.to_string()))?;
        entry.name = new_entry_name.to_string();
        entry.touch();
        nb.entries.insert(new_entry_name.to_string(), entry.clone());

        info!("Renamed entry");
        Ok(entry)
    })
}

/// Replaces an entry's content.
///
/// # Errors
///
/// - `Validation` if the content is longer than the limit
/// - `NotFound` if the entry does not exist
pub fn set_entry_content(
    store: &NotebookStore,
    notebook: &str,
    passphrase: &str,
    entry_name: &str,
    new_content: &str,
) -> AppResult<Entry> {
    let span = operation_span("set_entry_content", notebook);
    let _enter = span.enter();

    validation::entry_name(entry_name)?;
    validation::entry_content(new_content)?;

    store.update_with(notebook, passphrase, |nb| {
        let entry = nb
            .entries
            .get_mut(entry_name)
            .ok_or_else(|| NotebookError::EntryNotFound(entry_name.to_string()))?;
        entry.content = new_content.to_string();
        entry.touch();

        info!("Updated entry content ({} characters)", new_content.chars().count());
        Ok(entry.clone())
    })
}

/// Searches entry names and contents.
///
/// An empty query matches nothing. Plain queries match case-insensitive
/// substrings; with `regex_search` the query is a case-sensitive regular
/// expression. A match on either the name or the content selects the entry.
///
/// # Errors
///
/// - `InvalidQuery` if `regex_search` is set and the pattern does not compile
pub fn search_entries(
    store: &NotebookStore,
    notebook: &str,
    passphrase: &str,
    query: &str,
    regex_search: bool,
) -> AppResult<Entries> {
    let span = operation_span("search_entries", notebook);
    let _enter = span.enter();

    validation::search_query(query)?;
    let query = SearchQuery::compile(query, regex_search)?;

    store.read_with(notebook, passphrase, |nb| {
        let matches: Entries = nb
            .entries
            .into_iter()
            .filter(|(_, entry)| query.matches(entry))
            .collect();

        debug!("Search matched {} entries", matches.len());
        Ok(matches)
    })
}

/// Deletes an entry.
///
/// # Errors
///
/// - `NotFound` if the entry does not exist
pub fn delete_entry(
    store: &NotebookStore,
    notebook: &str,
    passphrase: &str,
    entry_name: &str,
) -> AppResult<()> {
    let span = operation_span("delete_entry", notebook);
    let _enter = span.enter();

    validation::entry_name(entry_name)?;

    store.update_with(notebook, passphrase, |nb| {
        nb.entries
            .remove(entry_name)
            .ok_or_else(|| NotebookError::EntryNotFound(entry_name.to_string()))?;

        info!("Deleted entry");
        Ok(())
    })
}
