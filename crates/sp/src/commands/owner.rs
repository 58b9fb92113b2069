//! `sp owner` subcommand group.

use clap::Subcommand;

use super::Context;
use crate::error::CliError;

/// Owner commands.
#[derive(Subcommand)]
pub(crate) enum OwnerCommand {
    /// Grant a user edit rights.
    Add {
        post_id: String,
        username: String,
    },
    /// Revoke a user's edit rights.
    Remove {
        post_id: String,
        username: String,
    },
    /// List the owners of a post.
    List { post_id: String },
}

impl OwnerCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        match self {
            Self::Add { post_id, username } => {
                ctx.authorize(&post_id)?;
                let snapshot = ctx.controller.add_owner(&post_id, &username)?;
                ctx.saved(&format!("{username} now owns {post_id}"), &snapshot);
            }
            Self::Remove { post_id, username } => {
                ctx.authorize(&post_id)?;
                let snapshot = ctx.controller.remove_owner(&post_id, &username)?;
                ctx.saved(&format!("{username} no longer owns {post_id}"), &snapshot);
            }
            Self::List { post_id } => {
                let snapshot = ctx.controller.load_document(&post_id)?;
                let creator = &snapshot.document.created_by;
                for owner in &snapshot.document.owners {
                    let detail = if owner == creator { "creator" } else { "" };
                    ctx.output.item(owner, detail);
                }
            }
        }
        Ok(())
    }
}
