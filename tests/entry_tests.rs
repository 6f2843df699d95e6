//! Integration tests for entry operations inside a notebook.

mod test_helpers;

use eno::entries::{
    create_entry, delete_entry, get_entry, list_entries, rename_entry, search_entries,
    set_entry_content,
};
use eno::errors::ErrorKind;
use eno::store::NotebookStore;
use std::fs;
use tempfile::TempDir;
use test_helpers::{temp_store, OTHER_PASSPHRASE, TEST_PASSPHRASE};

const NOTEBOOK: &str = "Diary";

fn store_with_notebook() -> (TempDir, NotebookStore) {
    let (dir, store) = temp_store();
    store.create(NOTEBOOK, "", TEST_PASSPHRASE).unwrap();
    (dir, store)
}

fn notebook_file(store: &NotebookStore) -> Vec<u8> {
    fs::read(store.dir().join("Diary.eno")).unwrap()
}

fn add(store: &NotebookStore, name: &str, content: &str) {
    create_entry(store, NOTEBOOK, TEST_PASSPHRASE, name).unwrap();
    set_entry_content(store, NOTEBOOK, TEST_PASSPHRASE, name, content).unwrap();
}

#[test]
fn test_create_entry_starts_empty_and_bumps_notebook() {
    let (_dir, store) = store_with_notebook();

    let entry = create_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "Monday").unwrap();

    assert_eq!(entry.name, "Monday");
    assert!(entry.content.is_empty());
    assert!(entry.edit_time.is_none());
    let notebook = store.open(NOTEBOOK, TEST_PASSPHRASE).unwrap();
    assert!(notebook.edit_time.is_some());
    assert_eq!(notebook.entries.get("Monday"), Some(&entry));
}

#[test]
fn test_duplicate_entry_is_rejected() {
    let (_dir, store) = store_with_notebook();
    create_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "Monday").unwrap();
    let before = notebook_file(&store);

    let error = create_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "Monday").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::DuplicateEntry);
    assert_eq!(notebook_file(&store), before);
}

#[test]
fn test_entry_operations_need_the_right_key() {
    let (_dir, store) = store_with_notebook();
    let error = create_entry(&store, NOTEBOOK, OTHER_PASSPHRASE, "Monday").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::WrongKey);
}

#[test]
fn test_set_content_then_get() {
    let (_dir, store) = store_with_notebook();
    create_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "Monday").unwrap();

    let updated =
        set_entry_content(&store, NOTEBOOK, TEST_PASSPHRASE, "Monday", "buy milk").unwrap();
    let fetched = get_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "Monday").unwrap();

    assert_eq!(fetched, updated);
    assert_eq!(fetched.content, "buy milk");
    assert!(fetched.edit_time.is_some());
}

#[test]
fn test_get_missing_entry_is_not_found() {
    let (_dir, store) = store_with_notebook();
    let error = get_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "Nope").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
}

#[test]
fn test_content_over_limit_is_rejected_before_io() {
    let (_dir, store) = store_with_notebook();
    create_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "Monday").unwrap();

    let too_long = "x".repeat(65537);
    let error =
        set_entry_content(&store, NOTEBOOK, TEST_PASSPHRASE, "Monday", &too_long).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);

    let at_limit = "x".repeat(65536);
    assert!(set_entry_content(&store, NOTEBOOK, TEST_PASSPHRASE, "Monday", &at_limit).is_ok());
}

#[test]
fn test_read_only_operations_do_not_write() {
    let (_dir, store) = store_with_notebook();
    add(&store, "Monday", "buy milk");
    let before = notebook_file(&store);

    list_entries(&store, NOTEBOOK, TEST_PASSPHRASE).unwrap();
    get_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "Monday").unwrap();
    search_entries(&store, NOTEBOOK, TEST_PASSPHRASE, "milk", false).unwrap();

    assert_eq!(notebook_file(&store), before);
}

#[test]
fn test_rename_entry_moves_key_and_name() {
    let (_dir, store) = store_with_notebook();
    add(&store, "Monday", "buy milk");

    let renamed = rename_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "Monday", "Tuesday").unwrap();

    assert_eq!(renamed.name, "Tuesday");
    assert_eq!(renamed.content, "buy milk");
    let entries = list_entries(&store, NOTEBOOK, TEST_PASSPHRASE).unwrap();
    assert!(!entries.contains_key("Monday"));
    assert_eq!(entries["Tuesday"].name, "Tuesday");
}

#[test]
fn test_rename_entry_collision_leaves_both_unchanged() {
    let (_dir, store) = store_with_notebook();
    add(&store, "A", "first");
    add(&store, "B", "second");
    let before = notebook_file(&store);

    let error = rename_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "A", "B").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::DuplicateEntry);
    assert_eq!(notebook_file(&store), before);
    let entries = list_entries(&store, NOTEBOOK, TEST_PASSPHRASE).unwrap();
    assert_eq!(entries["A"].content, "first");
    assert_eq!(entries["B"].content, "second");
}

#[test]
fn test_rename_missing_entry_is_not_found() {
    let (_dir, store) = store_with_notebook();
    let error = rename_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "A", "B").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
}

#[test]
fn test_rename_entry_to_itself_only_touches_it() {
    let (_dir, store) = store_with_notebook();
    add(&store, "A", "first");

    let renamed = rename_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "A", "A").unwrap();

    assert_eq!(renamed.content, "first");
    assert_eq!(list_entries(&store, NOTEBOOK, TEST_PASSPHRASE).unwrap().len(), 1);
}

#[test]
fn test_delete_entry() {
    let (_dir, store) = store_with_notebook();
    add(&store, "A", "first");

    delete_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "A").unwrap();

    assert!(list_entries(&store, NOTEBOOK, TEST_PASSPHRASE)
        .unwrap()
        .is_empty());
    let error = delete_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "A").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
}

#[test]
fn test_substring_search_is_case_insensitive() {
    let (_dir, store) = store_with_notebook();
    add(&store, "Groceries", "Buy MILK and eggs");
    add(&store, "Milk run", "");
    add(&store, "Work", "quarterly report");

    let hits = search_entries(&store, NOTEBOOK, TEST_PASSPHRASE, "milk", false).unwrap();

    let names: Vec<&str> = hits.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Groceries", "Milk run"]);
}

#[test]
fn test_regex_search_is_case_sensitive() {
    let (_dir, store) = store_with_notebook();
    add(&store, "Groceries", "Buy MILK and eggs");
    add(&store, "Milk run", "");

    let hits = search_entries(&store, NOTEBOOK, TEST_PASSPHRASE, "^Milk", true).unwrap();

    assert_eq!(hits.len(), 1);
    assert!(hits.contains_key("Milk run"));
}

#[test]
fn test_empty_query_returns_nothing_but_checks_key() {
    let (_dir, store) = store_with_notebook();
    add(&store, "Groceries", "Buy milk");

    let hits = search_entries(&store, NOTEBOOK, TEST_PASSPHRASE, "", false).unwrap();
    assert!(hits.is_empty());

    let error = search_entries(&store, NOTEBOOK, OTHER_PASSPHRASE, "", false).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::WrongKey);
}

#[test]
fn test_invalid_regex_is_invalid_query() {
    let (_dir, store) = store_with_notebook();
    let error = search_entries(&store, NOTEBOOK, TEST_PASSPHRASE, "(", true).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidQuery);
}

#[test]
fn test_entries_survive_many_mutations() {
    let (_dir, store) = store_with_notebook();
    for i in 0..20 {
        add(&store, &format!("entry-{:02}", i), &format!("content {}", i));
    }

    let entries = list_entries(&store, NOTEBOOK, TEST_PASSPHRASE).unwrap();

    assert_eq!(entries.len(), 20);
    assert_eq!(entries["entry-07"].content, "content 7");
}

#[test]
fn test_every_entry_mutation_advances_notebook_edit_time() {
    let (_dir, store) = store_with_notebook();
    let edit_time = || {
        store
            .open(NOTEBOOK, TEST_PASSPHRASE)
            .unwrap()
            .edit_time
            .expect("notebook has been edited")
    };
    let pause = || std::thread::sleep(std::time::Duration::from_millis(2));

    create_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "A").unwrap();
    let after_create = edit_time();

    pause();
    set_entry_content(&store, NOTEBOOK, TEST_PASSPHRASE, "A", "first").unwrap();
    let after_write = edit_time();
    assert!(after_write > after_create);

    pause();
    rename_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "A", "B").unwrap();
    let after_rename = edit_time();
    assert!(after_rename > after_write);

    pause();
    delete_entry(&store, NOTEBOOK, TEST_PASSPHRASE, "B").unwrap();
    let after_delete = edit_time();
    assert!(after_delete > after_rename);
}
