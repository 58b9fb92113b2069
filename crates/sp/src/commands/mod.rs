//! CLI command implementations.

pub(crate) mod config;
pub(crate) mod document;
pub(crate) mod element;
pub(crate) mod owner;
pub(crate) mod page;

use std::path::PathBuf;

use clap::Args;
use serde_json::Value;
use sp_config::{Backend, CliSettings, Config};
use sp_document::{Controller, ControllerOptions, Snapshot};
use sp_store::{FileStore, MemoryStore, Revision, Store};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use config::ConfigCommand;
pub(crate) use document::{CloneArgs, InitArgs, PublishArgs, SetArgs, ShowArgs};
pub(crate) use element::ElementCommand;
pub(crate) use owner::OwnerCommand;
pub(crate) use page::PageCommand;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover stackpost.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory of the file store (overrides config).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Fail when an element id matches nothing (overrides config).
    #[arg(long, global = true)]
    strict: bool,

    /// Act as this user; edits are refused unless the user owns the post.
    #[arg(short, long, global = true, env = "STACKPOST_USER")]
    user: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Loaded configuration and an open controller.
pub(crate) struct Context {
    pub controller: Controller<Box<dyn Store>>,
    pub output: Output,
    user: Option<String>,
}

impl Context {
    /// Load config and open the configured store.
    pub(crate) fn open(global: &GlobalArgs) -> Result<Self, CliError> {
        let cli_settings = CliSettings {
            backend: None,
            data_dir: global.data_dir.clone(),
            strict: global.strict.then_some(true),
        };
        let config = Config::load(global.config.as_deref(), Some(&cli_settings))?;

        let store: Box<dyn Store> = match config.store_resolved.backend {
            Backend::File => Box::new(FileStore::open(&config.store_resolved.data_dir)?),
            Backend::Memory => {
                tracing::warn!("Memory backend selected; nothing is kept after this command");
                Box::new(MemoryStore::new())
            }
        };
        let options = ControllerOptions {
            strict: config.editor.strict,
        };

        Ok(Self {
            controller: Controller::new(store, options),
            output: Output::new(),
            user: global.user.clone(),
        })
    }

    /// Refuse to edit `post_id` unless the acting user owns it.
    pub(crate) fn authorize(&self, post_id: &str) -> Result<(), CliError> {
        if let Some(user) = &self.user {
            self.controller.check_owner(post_id, user)?;
        }
        Ok(())
    }

    /// Acting user, required for commands that record one.
    pub(crate) fn require_user(&self) -> Result<&str, CliError> {
        self.user.as_deref().ok_or_else(|| {
            CliError::Validation("--user (or STACKPOST_USER) is required".to_owned())
        })
    }

    /// Report a written snapshot.
    pub(crate) fn saved(&self, what: &str, snapshot: &Snapshot) {
        self.output
            .success(&format!("{what} (revision {})", snapshot.revision));
    }

    /// Revision of the stored document, taken before a lenient edit.
    pub(crate) fn revision(&self, post_id: &str) -> Result<Revision, CliError> {
        Ok(self.controller.load_document(post_id)?.revision)
    }

    /// Report an edit that may have been a no-op. Returns whether a new
    /// revision was written.
    pub(crate) fn saved_if_changed(
        &self,
        before: Revision,
        snapshot: &Snapshot,
        what: &str,
        unchanged: &str,
    ) -> bool {
        if snapshot.revision == before {
            self.output.warning(unchanged);
            false
        } else {
            self.saved(what, snapshot);
            true
        }
    }
}

/// A JSON object given inline or read from a file.
#[derive(Args)]
pub(crate) struct JsonInput {
    /// JSON object, e.g. '{"type": "Text", "text": "Hello"}'.
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    json: Option<String>,

    /// Read the JSON object from a file ("-" for stdin).
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl JsonInput {
    pub(crate) fn read(&self) -> Result<Value, CliError> {
        let text = match (&self.json, &self.file) {
            (Some(json), _) => json.clone(),
            (None, Some(path)) if path.as_os_str() == "-" => std::io::read_to_string(std::io::stdin())?,
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => return Err(CliError::Validation("no JSON input given".to_owned())),
        };
        parse_object(&text)
    }
}

/// Parse `text` as a JSON object.
fn parse_object(text: &str) -> Result<Value, CliError> {
    let value: Value = serde_json::from_str(text)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(CliError::Validation("expected a JSON object".to_owned()))
    }
}
