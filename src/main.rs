/*!
# Eno command-line interface

A thin request layer over the notebook store: one subcommand per store, entry
and settings operation. Successful results are printed to stdout as JSON.
Failures print `error: <message>` to stderr and exit with status 1.

## Usage

```text
eno notebook create <NAME> [-d <DESCRIPTION>]
eno notebook list | show <NAME> | open <NAME>
eno notebook rename <NAME> <NEW_NAME> | describe <NAME> <DESCRIPTION>
eno notebook rekey <NAME> | delete <NAME>

eno entry create|get|delete -n <NOTEBOOK> <NAME>
eno entry list -n <NOTEBOOK>
eno entry rename -n <NOTEBOOK> <NAME> <NEW_NAME>
eno entry write -n <NOTEBOOK> <NAME> [-c <CONTENT>]   (stdin when -c is absent)
eno entry search -n <NOTEBOOK> <QUERY> [--regex]

eno settings list | get <KEY> | set <KEY> <VALUE> | delete <KEY>
```

## Configuration

- `ENO_DIR`: data directory (defaults to `~/.eno`)
- `ENO_PASSPHRASE` / `ENO_NEW_PASSPHRASE`: passphrases for non-interactive use;
  when unset the passphrase is prompted for without echo
- `ENO_LOG_FORMAT`: `text` or `json`; `ENO_LOG_LEVEL` or `RUST_LOG` set verbosity
*/

use eno::cli::{self, CliArgs, Command, EntryCommand, NotebookCommand, SettingsCommand};
use eno::constants::{
    ENV_VAR_ENO_NEW_PASSPHRASE, ENV_VAR_ENO_PASSPHRASE, TRACING_ROOT_SPAN_NAME,
    TRACING_SERVICE_NAME,
};
use eno::entries;
use eno::errors::AppResult;
use eno::{logging, Config, NotebookDetails, NotebookStore, Settings};
use serde::Serialize;
use std::env;
use std::io::{self, Read};
use std::process::ExitCode;
use tracing::{debug, error, info_span};
use uuid::Uuid;
use zeroize::Zeroizing;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match Config::load().and_then(|config| config.validate().map(|()| config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_tracing(&config.log_format, &config.log_level) {
        eprintln!("error: {}", e.user_message());
        return ExitCode::FAILURE;
    }

    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %Uuid::new_v4()
    );
    let _enter = root_span.enter();
    debug!("Loaded configuration: {:?}", config);

    match run(args.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, kind = %e.kind(), "Command failed");
            eprintln!("error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &Config) -> AppResult<()> {
    match command {
        Command::Notebook(command) => {
            let store = NotebookStore::open_dir(config.notebooks_dir())?;
            run_notebook(command, &store)
        }
        Command::Entry(command) => {
            let store = NotebookStore::open_dir(config.notebooks_dir())?;
            run_entry(command, &store)
        }
        Command::Settings(command) => {
            let settings = Settings::new(config.settings_path());
            run_settings(command, &settings)
        }
    }
}

fn run_notebook(command: NotebookCommand, store: &NotebookStore) -> AppResult<()> {
    match command {
        NotebookCommand::Create { name, description } => {
            let passphrase = read_passphrase(ENV_VAR_ENO_PASSPHRASE, "Notebook passphrase: ")?;
            let notebook = store.create(&name, &description, &passphrase)?;
            print_json(&notebook)
        }
        NotebookCommand::List => {
            let details: Vec<NotebookDetails> =
                store.list()?.iter().map(|notebook| notebook.details()).collect();
            print_json(&details)
        }
        NotebookCommand::Show { name } => print_json(&store.details(&name)?),
        NotebookCommand::Open { name } => {
            let passphrase = read_passphrase(ENV_VAR_ENO_PASSPHRASE, "Notebook passphrase: ")?;
            print_json(&store.open(&name, &passphrase)?)
        }
        NotebookCommand::Rename { name, new_name } => {
            print_json(&store.rename(&name, &new_name)?.details())
        }
        NotebookCommand::Describe { name, description } => {
            print_json(&store.set_description(&name, &description)?.details())
        }
        NotebookCommand::Rekey { name } => {
            let passphrase = read_passphrase(ENV_VAR_ENO_PASSPHRASE, "Current passphrase: ")?;
            let new_passphrase = read_passphrase(ENV_VAR_ENO_NEW_PASSPHRASE, "New passphrase: ")?;
            store.rekey(&name, &passphrase, &new_passphrase)
        }
        NotebookCommand::Delete { name } => {
            let passphrase = read_passphrase(ENV_VAR_ENO_PASSPHRASE, "Notebook passphrase: ")?;
            store.delete(&name, &passphrase)
        }
    }
}

fn run_entry(command: EntryCommand, store: &NotebookStore) -> AppResult<()> {
    let passphrase = read_passphrase(ENV_VAR_ENO_PASSPHRASE, "Notebook passphrase: ")?;

    match command {
        EntryCommand::Create { target, name } => print_json(&entries::create_entry(
            store,
            &target.notebook,
            &passphrase,
            &name,
        )?),
        EntryCommand::List { target } => print_json(&entries::list_entries(
            store,
            &target.notebook,
            &passphrase,
        )?),
        EntryCommand::Get { target, name } => print_json(&entries::get_entry(
            store,
            &target.notebook,
            &passphrase,
            &name,
        )?),
        EntryCommand::Rename {
            target,
            name,
            new_name,
        } => print_json(&entries::rename_entry(
            store,
            &target.notebook,
            &passphrase,
            &name,
            &new_name,
        )?),
        EntryCommand::Write {
            target,
            name,
            content,
        } => {
            let content = match content {
                Some(content) => content,
                None => read_stdin()?,
            };
            print_json(&entries::set_entry_content(
                store,
                &target.notebook,
                &passphrase,
                &name,
                &content,
            )?)
        }
        EntryCommand::Search {
            target,
            query,
            regex,
        } => print_json(&entries::search_entries(
            store,
            &target.notebook,
            &passphrase,
            &query,
            regex,
        )?),
        EntryCommand::Delete { target, name } => {
            entries::delete_entry(store, &target.notebook, &passphrase, &name)
        }
    }
}

fn run_settings(command: SettingsCommand, settings: &Settings) -> AppResult<()> {
    match command {
        SettingsCommand::List => print_json(&settings.all()?),
        SettingsCommand::Get { key } => print_json(&settings.get(&key)?),
        SettingsCommand::Set { key, value } => settings.set(&key, cli::parse_setting_value(&value)),
        SettingsCommand::Delete { key } => settings.delete(&key),
    }
}

/// Reads a passphrase from `env_var`, or prompts for it without echo.
fn read_passphrase(env_var: &str, prompt: &str) -> AppResult<Zeroizing<String>> {
    if let Ok(value) = env::var(env_var) {
        debug!("Using passphrase from {}", env_var);
        return Ok(Zeroizing::new(value));
    }
    Ok(Zeroizing::new(rpassword::prompt_password(prompt)?))
}

fn read_stdin() -> AppResult<String> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    Ok(content)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{}", rendered);
    Ok(())
}
