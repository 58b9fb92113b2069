//! Operations on a whole [`AppInstance`].
//!
//! Find, update and delete by id are document-wide: they sweep the home page
//! and every page in one call. Adding and reordering children is scoped to
//! one named tree.

use sp_schema::{AppInstance, Element};

use crate::{PageTree, Rewrite, forest};

/// Document-level entry points into the tree engine.
pub trait DocumentTree: Sized {
    /// First element with `id`, searching home then pages in key order.
    fn find_element(&self, id: &str) -> Option<&Element>;

    /// Replace the element with `id` wherever it occurs.
    fn update_element(self, id: &str, replacement: &Element) -> Rewrite<Self>;

    /// Delete the element with `id` (and its subtree) wherever it occurs.
    fn delete_element(self, id: &str) -> Rewrite<Self>;

    /// Append `child` under `parent_id` within the tree selected by `page_id`.
    fn add_child_in(self, page_id: &str, parent_id: &str, child: Element) -> Rewrite<Self>;

    /// Reorder the children of `parent_id` within the tree selected by `page_id`.
    fn reorder_children_in<S: AsRef<str>>(
        self,
        page_id: &str,
        parent_id: &str,
        order: &[S],
    ) -> Rewrite<Self>;
}

impl DocumentTree for AppInstance {
    fn find_element(&self, id: &str) -> Option<&Element> {
        self.trees().find_map(|page| page.find(id))
    }

    fn update_element(mut self, id: &str, replacement: &Element) -> Rewrite<Self> {
        let mut matched = false;
        for page in self.trees_mut() {
            let children = std::mem::take(&mut page.children);
            let rewrite = forest::update_by_id(children, id, replacement);
            matched |= rewrite.matched;
            page.children = rewrite.value;
        }
        Rewrite::new(self, matched)
    }

    fn delete_element(mut self, id: &str) -> Rewrite<Self> {
        let mut matched = false;
        for page in self.trees_mut() {
            let children = std::mem::take(&mut page.children);
            let rewrite = forest::delete_by_id(children, id);
            matched |= rewrite.matched;
            page.children = rewrite.value;
        }
        Rewrite::new(self, matched)
    }

    fn add_child_in(mut self, page_id: &str, parent_id: &str, child: Element) -> Rewrite<Self> {
        let matched = match self.tree_mut(page_id) {
            Some(page) => {
                let rewrite = std::mem::take(page).add_child(parent_id, child);
                *page = rewrite.value;
                rewrite.matched
            }
            None => false,
        };
        Rewrite::new(self, matched)
    }

    fn reorder_children_in<S: AsRef<str>>(
        mut self,
        page_id: &str,
        parent_id: &str,
        order: &[S],
    ) -> Rewrite<Self> {
        let matched = match self.tree_mut(page_id) {
            Some(page) => {
                let rewrite = std::mem::take(page).reorder_children(parent_id, order);
                *page = rewrite.value;
                rewrite.matched
            }
            None => false,
        };
        Rewrite::new(self, matched)
    }
}
