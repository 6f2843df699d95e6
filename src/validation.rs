//! Length policy checks shared by the store, entry and settings operations.
//!
//! Lengths are counted in characters, not bytes. All checks run before any disk
//! or cipher work.

use crate::constants::*;
use crate::errors::{length_error, AppResult};

fn check_length(value: &str, field: &str, min: usize, max: usize) -> AppResult<()> {
    let length = value.chars().count();
    if length < min || length > max {
        return Err(length_error(field, min, max));
    }
    Ok(())
}

pub fn notebook_name(name: &str) -> AppResult<()> {
    check_length(
        name,
        "notebook name",
        NOTEBOOK_NAME_MIN_LENGTH,
        NOTEBOOK_NAME_MAX_LENGTH,
    )
}

pub fn notebook_description(description: &str) -> AppResult<()> {
    check_length(
        description,
        "notebook description",
        NOTEBOOK_DESCRIPTION_MIN_LENGTH,
        NOTEBOOK_DESCRIPTION_MAX_LENGTH,
    )
}

pub fn notebook_key(passphrase: &str) -> AppResult<()> {
    check_length(
        passphrase,
        "notebook key",
        NOTEBOOK_KEY_MIN_LENGTH,
        NOTEBOOK_KEY_MAX_LENGTH,
    )
}

pub fn entry_name(name: &str) -> AppResult<()> {
    check_length(
        name,
        "entry name",
        ENTRY_NAME_MIN_LENGTH,
        ENTRY_NAME_MAX_LENGTH,
    )
}

pub fn entry_content(content: &str) -> AppResult<()> {
    check_length(
        content,
        "entry content",
        ENTRY_CONTENT_MIN_LENGTH,
        ENTRY_CONTENT_MAX_LENGTH,
    )
}

pub fn search_query(query: &str) -> AppResult<()> {
    check_length(
        query,
        "search query",
        SEARCH_QUERY_MIN_LENGTH,
        SEARCH_QUERY_MAX_LENGTH,
    )
}

pub fn settings_key(key: &str) -> AppResult<()> {
    check_length(
        key,
        "settings key",
        SETTINGS_KEY_MIN_LENGTH,
        SETTINGS_KEY_MAX_LENGTH,
    )
}
