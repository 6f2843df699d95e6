use crate::constants::{APP_DESCRIPTION, APP_NAME};
use clap::{Args, Parser, Subcommand};

/// An encrypted, file-backed notebook store
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Manage notebooks
    #[clap(subcommand)]
    Notebook(NotebookCommand),

    /// Manage entries inside a notebook
    #[clap(subcommand)]
    Entry(EntryCommand),

    /// Manage application settings
    #[clap(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum NotebookCommand {
    /// Create a new, empty notebook
    Create {
        name: String,
        /// Plaintext description stored alongside the notebook
        #[clap(short, long, default_value = "")]
        description: String,
    },

    /// List all notebooks (no passphrase needed)
    List,

    /// Show a notebook's plaintext details (no passphrase needed)
    Show { name: String },

    /// Decrypt a notebook and print it with all entries
    Open { name: String },

    /// Rename a notebook
    Rename { name: String, new_name: String },

    /// Replace a notebook's description
    Describe { name: String, description: String },

    /// Re-encrypt a notebook under a new passphrase
    Rekey { name: String },

    /// Delete a notebook (the passphrase is required)
    Delete { name: String },
}

/// Identifies the notebook an entry command works on.
#[derive(Args, Debug, PartialEq, Eq)]
pub struct NotebookArg {
    /// Notebook name
    #[clap(short, long)]
    pub notebook: String,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum EntryCommand {
    /// Create an empty entry
    Create {
        #[clap(flatten)]
        target: NotebookArg,
        name: String,
    },

    /// List every entry
    List {
        #[clap(flatten)]
        target: NotebookArg,
    },

    /// Print one entry
    Get {
        #[clap(flatten)]
        target: NotebookArg,
        name: String,
    },

    /// Rename an entry
    Rename {
        #[clap(flatten)]
        target: NotebookArg,
        name: String,
        new_name: String,
    },

    /// Replace an entry's content (read from stdin unless --content is given)
    Write {
        #[clap(flatten)]
        target: NotebookArg,
        name: String,
        #[clap(short, long)]
        content: Option<String>,
    },

    /// Search entry names and contents
    Search {
        #[clap(flatten)]
        target: NotebookArg,
        query: String,
        /// Treat the query as a case-sensitive regular expression
        #[clap(short, long)]
        regex: bool,
    },

    /// Delete an entry
    Delete {
        #[clap(flatten)]
        target: NotebookArg,
        name: String,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SettingsCommand {
    /// Print all settings
    List,

    /// Print one setting
    Get { key: String },

    /// Set a setting. The value is parsed as JSON, falling back to a plain string.
    Set { key: String, value: String },

    /// Remove a setting
    Delete { key: String },
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        <CliArgs as Parser>::parse()
    }
}

/// Parses a settings value given on the command line.
///
/// Valid JSON (`true`, `14`, `{"a":1}`, `"quoted"`) is kept as is. Anything
/// else is stored as a string.
pub fn parse_setting_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}
