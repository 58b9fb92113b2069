//! A store bound to one key.

use crate::error::{StoreError, StoreErrorKind};
use crate::store::{CONFIG_KEY, Entry, Expect, Revision, Store, document_key};

/// One record of a [`Store`], with create/read/update semantics.
///
/// ```
/// use sp_store::{MemoryStore, Slot, StoreErrorKind};
///
/// let store = MemoryStore::new();
/// let slot = Slot::document(&store, "t3_abc").unwrap();
/// let revision = slot.create(b"{}").unwrap();
/// assert_eq!(slot.create(b"{}").unwrap_err().kind(), StoreErrorKind::AlreadyExists);
/// slot.update(b"{\"x\":1}", revision).unwrap();
/// ```
#[derive(Debug)]
pub struct Slot<'s, S: Store + ?Sized> {
    store: &'s S,
    key: String,
}

impl<'s, S: Store + ?Sized> Slot<'s, S> {
    /// Bind to an arbitrary key.
    pub fn new(store: &'s S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Bind to the document record of `post_id`.
    ///
    /// # Errors
    ///
    /// `InvalidKey` if `post_id` is blank.
    pub fn document(store: &'s S, post_id: &str) -> Result<Self, StoreError> {
        if post_id.trim().is_empty() {
            return Err(StoreError::new(StoreErrorKind::InvalidKey).with_key(document_key(post_id)));
        }
        Ok(Self::new(store, document_key(post_id)))
    }

    /// Bind to the singleton configuration record.
    pub fn config(store: &'s S) -> Self {
        Self::new(store, CONFIG_KEY)
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current entry, or `None` if absent.
    pub fn get(&self) -> Result<Option<Entry>, StoreError> {
        self.store.get(&self.key)
    }

    /// Current entry; `NotFound` if absent.
    pub fn read(&self) -> Result<Entry, StoreError> {
        self.get()?
            .ok_or_else(|| StoreError::not_found(self.key.clone()))
    }

    pub fn exists(&self) -> Result<bool, StoreError> {
        Ok(self.get()?.is_some())
    }

    /// Write a new record; `AlreadyExists` if one is present.
    pub fn create(&self, value: &[u8]) -> Result<Revision, StoreError> {
        self.store.put(&self.key, value, Expect::Absent)
    }

    /// Replace the record last read at `revision`.
    ///
    /// `NotFound` if it disappeared, `Conflict` if someone else wrote it since.
    pub fn update(&self, value: &[u8], revision: Revision) -> Result<Revision, StoreError> {
        self.store.put(&self.key, value, Expect::Revision(revision))
    }

    /// Replace the record whatever its revision; `NotFound` if absent.
    pub fn overwrite(&self, value: &[u8]) -> Result<Revision, StoreError> {
        self.store.put(&self.key, value, Expect::Present)
    }

    /// Write unconditionally, creating the record if needed.
    pub fn set(&self, value: &[u8]) -> Result<Revision, StoreError> {
        self.store.set(&self.key, value)
    }

    /// Remove the record. Returns whether it existed.
    pub fn remove(&self) -> Result<bool, StoreError> {
        self.store.delete(&self.key)
    }
}
