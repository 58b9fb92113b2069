//! Extension trait for [`Store`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::store::{Expect, Revision, Store};

/// Typed JSON access on top of any [`Store`].
///
/// Implemented as default methods on an extension trait so that:
///
/// - [`Store`] stays object-safe with no serde dependency in its signatures
/// - Implementors only need to handle raw bytes
/// - Callers get typed access via a blanket impl
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use sp_store::{Expect, MemoryStore, StoreExt};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Settings { title: String }
///
/// let store = MemoryStore::new();
/// let settings = Settings { title: "Hello".into() };
/// store.put_json("config", &settings, Expect::Any).unwrap();
/// let (loaded, revision) = store.get_json::<Settings>("config").unwrap().unwrap();
/// assert_eq!(loaded, settings);
/// assert_eq!(revision, 1);
/// ```
pub trait StoreExt: Store {
    /// Read and deserialize a key. `Ok(None)` if absent.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<(T, Revision)>, StoreError> {
        let Some(entry) = self.get(key)? else {
            return Ok(None);
        };
        let value = serde_json::from_slice(&entry.value).map_err(|e| StoreError::json(e, key))?;
        Ok(Some((value, entry.revision)))
    }

    /// Serialize and write a key if `expect` holds.
    fn put_json<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        expect: Expect,
    ) -> Result<Revision, StoreError> {
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::json(e, key))?;
        self.put(key, &bytes, expect)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}
