//! `sp page` subcommand group.

use clap::Subcommand;
use sp_schema::{Element, HOME_PAGE_ID};

use super::Context;
use crate::error::CliError;

/// Page commands.
#[derive(Subcommand)]
pub(crate) enum PageCommand {
    /// Add an empty page and print its id.
    Create { post_id: String },
    /// Print one page as JSON ("home" for the home page).
    Show { post_id: String, page_id: String },
    /// Delete a page and everything on it.
    Delete { post_id: String, page_id: String },
    /// List the pages of a post.
    List { post_id: String },
    /// List every element of a page, parents first.
    Tree { post_id: String, page_id: String },
}

impl PageCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        match self {
            Self::Create { post_id } => {
                ctx.authorize(&post_id)?;
                let page_id = ctx.controller.create_page(&post_id)?;
                ctx.output.success("Created page");
                ctx.output.item(&page_id, "");
            }
            Self::Show { post_id, page_id } => {
                let view = ctx.controller.read_page(&post_id, &page_id)?;
                ctx.output.json(&serde_json::to_value(view.page())?);
            }
            Self::Delete { post_id, page_id } => {
                ctx.authorize(&post_id)?;
                let snapshot = ctx.controller.delete_page(&post_id, &page_id)?;
                ctx.saved(&format!("Deleted page {page_id}"), &snapshot);
            }
            Self::List { post_id } => {
                let document = ctx.controller.load_document(&post_id)?.document;
                for page in document.trees() {
                    let count = format!("{} elements", count_elements(&page.children));
                    if page.id == HOME_PAGE_ID {
                        ctx.output.item(&page.id, &format!("{count}, home"));
                    } else {
                        ctx.output.item(&page.id, &count);
                    }
                }
            }
            Self::Tree { post_id, page_id } => {
                let elements = ctx.controller.flatten_page(&post_id, &page_id)?;
                if elements.is_empty() {
                    ctx.output.warning("Page is empty");
                }
                for element in &elements {
                    ctx.output.item(element.id(), element.kind().tag());
                }
            }
        }
        Ok(())
    }
}

fn count_elements(forest: &[Element]) -> usize {
    forest
        .iter()
        .map(|element| 1 + count_elements(element.children()))
        .sum()
}
