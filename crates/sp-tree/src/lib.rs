//! Tree mutation engine for Stackpost documents.
//!
//! Pure, synchronous rewrites over element forests:
//!
//! - [`forest`] functions work on a bare `Vec<Element>`
//! - [`PageTree`] adds root awareness (a page id is a valid parent)
//! - [`DocumentTree`] applies find/update/delete across the home page and all
//!   pages, and add/reorder within one named tree
//!
//! Nothing here fails. An id that matches nothing leaves the input unchanged,
//! and the returned [`Rewrite`] records whether anything matched so callers
//! can choose between [`Mode::Lenient`] and [`Mode::Strict`].
//!
//! # Example
//!
//! ```
//! use sp_schema::{Element, StackElement};
//! use sp_tree::forest;
//!
//! let tree = vec![Element::VStack(StackElement::new("v1").with_child(Element::text("t1", "Hi")))];
//! let tree = forest::delete_by_id(tree, "v1").lenient();
//! assert!(forest::find_by_id(&tree, "t1").is_none());
//! ```

mod document;
pub mod forest;
mod page;
mod rewrite;

pub use document::DocumentTree;
pub use page::PageTree;
pub use rewrite::{Mode, Rewrite, TreeError};
