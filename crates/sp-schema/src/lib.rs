//! Element and document model for Stackpost.
//!
//! A post's content is one [`AppInstance`] document: a home page, any number
//! of named pages, and per-page forests of [`Element`]s. Stacks nest to any
//! depth.
//!
//! Untyped input (form submissions, stored JSON) enters through
//! [`validate_document`] and [`validate_element`], which report every
//! offending field path at once in a [`ValidationError`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sp_schema::{Element, validate_element};
//!
//! let element = validate_element(&json!({
//!     "type": "VStack",
//!     "id": "v1",
//!     "children": [{ "type": "Text", "id": "t1", "text": "Hello" }]
//! }))
//! .unwrap();
//! assert_eq!(element.children()[0], Element::text("t1", "Hello"));
//! ```

mod document;
mod element;
mod validate;

pub use document::{AppInstance, HOME_PAGE_ID, Home, Page, Status, ThemeColor};
pub use element::{
    ButtonElement, Element, ElementKind, ImageElement, PaginationButtonElement,
    PersonalPlugElement, StackElement, TextElement,
};
pub use validate::{Issue, ValidationError, merge_fields, validate_document, validate_element};
