//! Key-value store abstraction for Stackpost.
//!
//! Documents live in a key-value store, one record per post. This crate
//! provides:
//!
//! - [`Store`] trait with `get()`, `put()` and `delete()`, where every put
//!   carries an [`Expect`] precondition checked against the key's revision
//! - [`MemoryStore`] for tests and embedding
//! - [`FileStore`] for a directory on disk
//! - [`Slot`], a store bound to one key (`document:<postId>` or `config`)
//!   with create/read/update semantics
//! - [`StoreExt`] for typed JSON access
//!
//! # Key Layout
//!
//! - `document:<postId>` - the JSON document of one post
//! - `config` - singleton configuration record
//!
//! # Example
//!
//! ```
//! use sp_store::{MemoryStore, Slot, Store};
//!
//! let store = MemoryStore::new();
//! let slot = Slot::document(&store, "t3_abc").unwrap();
//! slot.create(br#"{"title":"Hi"}"#).unwrap();
//! assert!(store.get("document:t3_abc").unwrap().is_some());
//! ```

mod error;
mod ext;
mod file;
mod memory;
mod slot;
mod store;

pub use error::{StoreError, StoreErrorKind};
pub use ext::StoreExt;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use slot::Slot;
pub use store::{
    CONFIG_KEY, DOCUMENT_KEY_PREFIX, Entry, Expect, Revision, Store, document_key,
};
