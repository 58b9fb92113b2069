//! Document controller for Stackpost.
//!
//! [`Controller`] owns a [`Store`](sp_store::Store) and runs every operation
//! as one cycle against a single post's record:
//!
//! 1. Load `document:<postId>` with its revision
//! 2. Apply the transformation (a tree rewrite or a field change)
//! 3. Validate the whole result
//! 4. Write it back conditional on the loaded revision
//!
//! A failure at any step leaves the stored document untouched.
//!
//! Ids that match nothing are no-ops by default. With
//! [`ControllerOptions::strict`] they fail with [`DocumentError::Tree`].
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sp_document::{Controller, ControllerOptions, NewDocument};
//! use sp_store::MemoryStore;
//!
//! let controller = Controller::new(MemoryStore::new(), ControllerOptions::default());
//! controller.create_document("t3_abc", NewDocument::new("alice")).unwrap();
//! controller
//!     .add_element("t3_abc", "home", "home", &json!({ "type": "Text", "text": "Hi" }))
//!     .unwrap();
//! assert_eq!(controller.flatten_page("t3_abc", "home").unwrap().len(), 1);
//! ```

mod app_config;
mod controller;
mod elements;
mod error;
mod pages;
mod snapshot;

pub use app_config::AppConfig;
pub use controller::{Controller, ControllerOptions};
pub use error::DocumentError;
pub use snapshot::{Added, NewDocument, PageView, Snapshot};
