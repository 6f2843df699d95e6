//! Notebook data model and on-disk envelope format.
//!
//! A notebook file is a JSON record whose name, description and timestamps are
//! plaintext, and whose `content` field is the sealed, base64-encoded entries
//! payload. This module defines both the decrypted and the encrypted form and
//! converts between them.
//!
//! # File format
//!
//! ```text
//! {
//!   "name": "Diary",
//!   "description": "Daily notes",
//!   "createTime": "2024-03-05T10:00:00Z",
//!   "editTime": "0001-01-01T00:00:00Z",
//!   "content": "<base64 of nonce || ciphertext || tag>"
//! }
//! ```
//!
//! The sealed payload decrypts to `{"entries": {<name>: <entry>, ...}}`.

mod serde_helpers;

use crate::crypto::{self, NotebookKey};
use crate::errors::{AppResult, NotebookError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entries of a notebook, keyed by entry name.
pub type Entries = BTreeMap<String, Entry>;

/// A single named text document inside a notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub name: String,
    pub create_time: DateTime<Utc>,
    #[serde(default, with = "serde_helpers::optional_time")]
    pub edit_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: String,
}

impl Entry {
    /// Creates an empty entry stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            create_time: Utc::now(),
            edit_time: None,
            content: String::new(),
        }
    }

    /// Marks the entry as edited now.
    pub fn touch(&mut self) {
        self.edit_time = Some(Utc::now());
    }
}

/// A notebook in its decrypted, in-memory form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub name: String,
    pub description: String,
    pub create_time: DateTime<Utc>,
    #[serde(with = "serde_helpers::optional_time")]
    pub edit_time: Option<DateTime<Utc>>,
    pub entries: Entries,
}

impl Notebook {
    /// Creates an empty notebook stamped with the current time.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            create_time: Utc::now(),
            edit_time: None,
            entries: Entries::new(),
        }
    }

    /// Marks the notebook as edited now.
    pub fn touch(&mut self) {
        self.edit_time = Some(Utc::now());
    }

    /// Seals the entries under `key` and returns the on-disk form.
    pub fn seal(&self, key: &NotebookKey) -> AppResult<EncryptedNotebook> {
        let payload = encode_entries(&self.entries)?;
        let content = crypto::seal(key, &payload)?;

        Ok(EncryptedNotebook {
            name: self.name.clone(),
            description: self.description.clone(),
            create_time: self.create_time,
            edit_time: self.edit_time,
            content,
        })
    }
}

/// A notebook as stored on disk: plaintext metadata plus sealed entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedNotebook {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub create_time: DateTime<Utc>,
    #[serde(default, with = "serde_helpers::optional_time")]
    pub edit_time: Option<DateTime<Utc>>,
    #[serde(with = "serde_helpers::base64_bytes")]
    pub content: Vec<u8>,
}

impl EncryptedNotebook {
    /// Authenticates and decrypts the entries under `key`.
    ///
    /// A failed authentication surfaces as `NotebookError::WrongKey`.
    pub fn open(&self, key: &NotebookKey) -> AppResult<Notebook> {
        let payload = crypto::open(key, &self.content).map_err(|e| {
            tracing::debug!("Notebook content failed to authenticate: {}", e);
            NotebookError::WrongKey
        })?;
        let entries = decode_entries(&payload)?;

        Ok(Notebook {
            name: self.name.clone(),
            description: self.description.clone(),
            create_time: self.create_time,
            edit_time: self.edit_time,
            entries,
        })
    }

    /// The plaintext metadata of this notebook.
    pub fn details(&self) -> NotebookDetails {
        NotebookDetails {
            name: self.name.clone(),
            description: self.description.clone(),
            create_time: self.create_time,
            edit_time: self.edit_time,
        }
    }

    /// Serializes the outer record to its file representation.
    pub fn to_json(&self) -> AppResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parses the outer record from its file representation.
    pub fn from_json(bytes: &[u8]) -> AppResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Plaintext metadata of a notebook, readable without its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookDetails {
    pub name: String,
    pub description: String,
    pub create_time: DateTime<Utc>,
    #[serde(default, with = "serde_helpers::optional_time")]
    pub edit_time: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct ContentRef<'a> {
    entries: &'a Entries,
}

#[derive(Deserialize)]
struct ContentOwned {
    #[serde(default)]
    entries: Option<Entries>,
}

/// Encodes the entries map into the payload that gets sealed.
pub fn encode_entries(entries: &Entries) -> AppResult<Vec<u8>> {
    Ok(serde_json::to_vec(&ContentRef { entries })?)
}

/// Decodes an opened payload back into the entries map.
///
/// A `null` or missing map decodes as empty.
pub fn decode_entries(payload: &[u8]) -> AppResult<Entries> {
    let content: ContentOwned = serde_json::from_slice(payload)?;
    Ok(content.entries.unwrap_or_default())
}
