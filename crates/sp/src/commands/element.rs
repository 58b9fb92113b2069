//! `sp element` subcommand group.

use clap::{Args, Subcommand};

use super::{Context, JsonInput};
use crate::error::CliError;

/// Element commands.
#[derive(Subcommand)]
pub(crate) enum ElementCommand {
    /// Append an element under a parent (a stack id or the page id).
    Add(AddArgs),
    /// Replace an element's fields; omitted children are kept.
    Update(UpdateArgs),
    /// Delete an element and its subtree.
    Delete { post_id: String, element_id: String },
    /// Set the order of a parent's children; unlisted children are removed.
    Reorder(ReorderArgs),
    /// Print one element as JSON.
    Show { post_id: String, element_id: String },
}

/// Arguments for the element add command.
#[derive(Args)]
pub(crate) struct AddArgs {
    post_id: String,
    page_id: String,
    parent_id: String,
    #[command(flatten)]
    input: JsonInput,
}

/// Arguments for the element update command.
#[derive(Args)]
pub(crate) struct UpdateArgs {
    post_id: String,
    element_id: String,
    #[command(flatten)]
    input: JsonInput,
}

/// Arguments for the element reorder command.
#[derive(Args)]
pub(crate) struct ReorderArgs {
    post_id: String,
    page_id: String,
    parent_id: String,
    /// Child ids in their new order.
    #[arg(required = true)]
    order: Vec<String>,
}

impl ElementCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        match self {
            Self::Add(args) => {
                ctx.authorize(&args.post_id)?;
                let raw = args.input.read()?;
                let added = ctx.controller.add_element(
                    &args.post_id,
                    &args.page_id,
                    &args.parent_id,
                    &raw,
                )?;
                if added.added {
                    ctx.saved(&format!("Added {}", added.element_id), &added.snapshot);
                } else {
                    ctx.output.warning(&format!(
                        "No container {} on page {}; nothing added",
                        args.parent_id, args.page_id
                    ));
                }
            }
            Self::Update(args) => {
                ctx.authorize(&args.post_id)?;
                let raw = args.input.read()?;
                let before = ctx.revision(&args.post_id)?;
                let snapshot = ctx
                    .controller
                    .update_element(&args.post_id, &args.element_id, &raw)?;
                ctx.saved_if_changed(
                    before,
                    &snapshot,
                    &format!("Updated {}", args.element_id),
                    &format!("No element {}; nothing updated", args.element_id),
                );
            }
            Self::Delete {
                post_id,
                element_id,
            } => {
                ctx.authorize(&post_id)?;
                let before = ctx.revision(&post_id)?;
                let snapshot = ctx.controller.delete_element(&post_id, &element_id)?;
                ctx.saved_if_changed(
                    before,
                    &snapshot,
                    &format!("Deleted {element_id}"),
                    &format!("No element {element_id}; nothing deleted"),
                );
            }
            Self::Reorder(args) => {
                ctx.authorize(&args.post_id)?;
                let snapshot = ctx.controller.reorder_children(
                    &args.post_id,
                    &args.page_id,
                    &args.parent_id,
                    args.order.as_slice(),
                )?;
                ctx.saved(&format!("Reordered {}", args.parent_id), &snapshot);
            }
            Self::Show {
                post_id,
                element_id,
            } => match ctx.controller.find_element(&post_id, &element_id)? {
                Some(element) => ctx.output.json(&serde_json::to_value(&element)?),
                None => ctx.output.warning(&format!("No element {element_id}")),
            },
        }
        Ok(())
    }
}
