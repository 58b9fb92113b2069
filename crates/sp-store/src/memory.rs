//! In-memory [`Store`] implementation.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::StoreError;
use crate::store::{Entry, Expect, Revision, Store, next_revision};

const BACKEND: &str = "Memory";

/// Store backed by a `HashMap`. Contents are lost when dropped.
///
/// # Example
///
/// ```
/// use sp_store::{Expect, MemoryStore, Store};
///
/// let store = MemoryStore::new().with_entry("config", b"{}");
/// assert_eq!(store.get("config").unwrap().unwrap().revision, 1);
/// assert!(store.put("config", b"{}", Expect::Absent).is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key at revision 1.
    #[must_use]
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key.into(),
                Entry {
                    value: value.into(),
                    revision: 1,
                },
            );
        self
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8], expect: Expect) -> Result<Revision, StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let current = entries.get(key).map(|entry| entry.revision);
        let revision = next_revision(key, current, expect, BACKEND)?;
        entries.insert(
            key.to_owned(),
            Entry {
                value: value.to_vec(),
                revision,
            },
        );
        tracing::debug!(key, revision, "Stored record");
        Ok(revision)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.remove(key).is_some())
    }
}
