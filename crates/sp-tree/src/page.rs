//! Tree-scoped operations on one page (or the home page).
//!
//! A page is the root of its forest, so `parent_id` may name the page itself
//! to target its top-level children.

use sp_schema::{Element, Page};

use crate::{Rewrite, forest};

/// Operations scoped to a single [`Page`].
pub trait PageTree: Sized {
    /// First element with `id` in this page.
    fn find(&self, id: &str) -> Option<&Element>;

    /// Every element of this page, pre-order.
    fn flatten(&self) -> Vec<&Element>;

    /// Append `child` under `parent_id` (the page id or a stack id).
    fn add_child(self, parent_id: &str, child: Element) -> Rewrite<Self>;

    /// Reorder (and prune) the children of `parent_id`.
    fn reorder_children<S: AsRef<str>>(self, parent_id: &str, order: &[S]) -> Rewrite<Self>;
}

impl PageTree for Page {
    fn find(&self, id: &str) -> Option<&Element> {
        forest::find_by_id(&self.children, id)
    }

    fn flatten(&self) -> Vec<&Element> {
        forest::flatten(&self.children)
    }

    fn add_child(mut self, parent_id: &str, child: Element) -> Rewrite<Self> {
        if self.id == parent_id {
            self.children.push(child);
            return Rewrite::new(self, true);
        }
        let children = std::mem::take(&mut self.children);
        forest::add_child(children, parent_id, child).map(|children| Self { children, ..self })
    }

    fn reorder_children<S: AsRef<str>>(mut self, parent_id: &str, order: &[S]) -> Rewrite<Self> {
        let children = std::mem::take(&mut self.children);
        if self.id == parent_id {
            self.children = forest::reorder(children, order);
            return Rewrite::new(self, true);
        }
        forest::reorder_children(children, parent_id, order)
            .map(|children| Self { children, ..self })
    }
}
