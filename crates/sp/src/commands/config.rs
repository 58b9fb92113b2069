//! `sp config` subcommand group: the stored `config` record.

use clap::Subcommand;
use sp_document::AppConfig;

use super::{Context, JsonInput};
use crate::error::CliError;

/// Config record commands.
#[derive(Subcommand)]
pub(crate) enum ConfigCommand {
    /// Print the config record (defaults if never written).
    Show,
    /// Replace the config record; missing fields take their defaults.
    Set(JsonInput),
}

impl ConfigCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        match self {
            Self::Show => {
                let config = ctx.controller.read_config()?;
                ctx.output.json(&serde_json::to_value(&config)?);
            }
            Self::Set(input) => {
                let config: AppConfig = serde_json::from_value(input.read()?)?;
                ctx.controller.write_config(&config)?;
                ctx.output.success("Saved config record");
            }
        }
        Ok(())
    }
}
