//! Whole-document commands: `init`, `show`, `clone`, `publish`, `set`.

use clap::Args;
use sp_document::NewDocument;

use super::{Context, JsonInput};
use crate::error::CliError;

/// Arguments for the init command.
#[derive(Args)]
pub(crate) struct InitArgs {
    /// Post to create the document for.
    post_id: String,

    /// Document title (default: from the config record).
    #[arg(long)]
    title: Option<String>,

    /// Header line.
    #[arg(long)]
    header: Option<String>,

    /// Subheader line.
    #[arg(long)]
    subheader: Option<String>,
}

impl InitArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let new = NewDocument {
            created_by: ctx.require_user()?.to_owned(),
            title: self.title,
            header: self.header,
            subheader: self.subheader,
            color: None,
        };
        let snapshot = ctx.controller.create_document(&self.post_id, new)?;
        ctx.saved(&format!("Created document for {}", self.post_id), &snapshot);
        Ok(())
    }
}

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// Post whose document to print.
    post_id: String,
}

impl ShowArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let snapshot = ctx.controller.load_document(&self.post_id)?;
        ctx.output.json(&serde_json::to_value(&snapshot.document)?);
        Ok(())
    }
}

/// Arguments for the clone command.
#[derive(Args)]
pub(crate) struct CloneArgs {
    /// Post to copy from.
    source: String,

    /// Post to copy to; must not have a document yet.
    target: String,
}

impl CloneArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let snapshot = ctx.controller.clone_document(&self.source, &self.target)?;
        ctx.saved(
            &format!("Cloned {} to {}", self.source, self.target),
            &snapshot,
        );
        Ok(())
    }
}

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Post to publish.
    post_id: String,

    /// Public URL of the published post.
    url: String,
}

impl PublishArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        ctx.authorize(&self.post_id)?;
        let snapshot = ctx.controller.publish(&self.post_id, &self.url)?;
        ctx.saved(&format!("Published {} at {}", self.post_id, self.url), &snapshot);
        Ok(())
    }
}

/// Arguments for the set command.
#[derive(Args)]
pub(crate) struct SetArgs {
    /// Post to update.
    post_id: String,

    #[command(flatten)]
    input: JsonInput,
}

impl SetArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        ctx.authorize(&self.post_id)?;
        let value = self.input.read()?;
        let Some(fields) = value.as_object() else {
            return Err(CliError::Validation("expected a JSON object".to_owned()));
        };
        let snapshot = ctx.controller.update_document_fields(&self.post_id, fields)?;
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        ctx.saved(&format!("Updated {}", names.join(", ")), &snapshot);
        Ok(())
    }
}
