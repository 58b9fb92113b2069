//! The [`Store`] trait and key layout.

use std::sync::Arc;

use crate::error::{StoreError, StoreErrorKind};

/// Monotonic per-key write counter. The first write of a key is revision 1.
pub type Revision = u64;

/// Key of the singleton configuration record.
pub const CONFIG_KEY: &str = "config";

/// Prefix of per-post document records.
pub const DOCUMENT_KEY_PREFIX: &str = "document:";

/// Key of the document record for `post_id`.
#[must_use]
pub fn document_key(post_id: &str) -> String {
    format!("{DOCUMENT_KEY_PREFIX}{post_id}")
}

/// A stored value with its revision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub value: Vec<u8>,
    pub revision: Revision,
}

/// Precondition for [`Store::put`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expect {
    /// Write unconditionally.
    Any,
    /// Key must not exist.
    Absent,
    /// Key must exist, at any revision.
    Present,
    /// Key must exist at exactly this revision.
    Revision(Revision),
}

/// Key-value persistence used by the document controller.
///
/// Values are opaque bytes. Every successful [`put`](Self::put) bumps the
/// key's revision; the [`Expect`] precondition and the write happen
/// atomically, which is what makes read-modify-write cycles safe against
/// concurrent editors.
pub trait Store: Send + Sync {
    /// Read a key. `Ok(None)` if absent.
    fn get(&self, key: &str) -> Result<Option<Entry>, StoreError>;

    /// Write a key if `expect` holds, returning the new revision.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` for [`Expect::Absent`] when the key exists
    /// - `NotFound` for [`Expect::Present`] / [`Expect::Revision`] when it doesn't
    /// - `Conflict` for [`Expect::Revision`] when the revision moved
    fn put(&self, key: &str, value: &[u8], expect: Expect) -> Result<Revision, StoreError>;

    /// Remove a key. Returns whether it existed.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Unconditional write.
    fn set(&self, key: &str, value: &[u8]) -> Result<Revision, StoreError> {
        self.put(key, value, Expect::Any)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8], expect: Expect) -> Result<Revision, StoreError> {
        (**self).put(key, value, expect)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key)
    }
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8], expect: Expect) -> Result<Revision, StoreError> {
        (**self).put(key, value, expect)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key)
    }
}

/// Check `expect` against the current revision and compute the next one.
///
/// Shared by the backends so they agree on precondition semantics.
pub(crate) fn next_revision(
    key: &str,
    current: Option<Revision>,
    expect: Expect,
    backend: &'static str,
) -> Result<Revision, StoreError> {
    let fail = |kind| Err(StoreError::new(kind).with_key(key).with_backend(backend));
    match (expect, current) {
        (Expect::Absent, Some(_)) => fail(StoreErrorKind::AlreadyExists),
        (Expect::Present | Expect::Revision(_), None) => fail(StoreErrorKind::NotFound),
        (Expect::Revision(expected), Some(actual)) if expected != actual => {
            tracing::warn!(key, expected, actual, "Revision conflict");
            fail(StoreErrorKind::Conflict)
        }
        (_, current) => Ok(current.unwrap_or(0) + 1),
    }
}
