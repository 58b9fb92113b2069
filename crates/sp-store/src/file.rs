//! File-based [`Store`] implementation.
//!
//! [`FileStore`] keeps one file per key directly under its root directory.
//! The file name is the percent-encoded key (so `document:t3_abc` becomes
//! `document%3At3%5Fabc`) and the content is a fixed header followed by the
//! value:
//!
//! ```text
//! [revision: u64 LE][value bytes]
//! ```
//!
//! Writes go to a uniquely named temporary file that is renamed over the
//! record, so a reader never sees a partially written value. Puts and deletes
//! hold an exclusive lock on `.lock` in the root directory while they check
//! the revision and rename, which keeps the check atomic across processes
//! sharing the directory.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tempfile::NamedTempFile;

use crate::error::{StoreError, StoreErrorKind};
use crate::store::{Entry, Expect, Revision, Store, next_revision};

const BACKEND: &str = "File";
const HEADER_LEN: usize = 8;
const LOCK_FILE: &str = ".lock";

/// [`Store`] rooted at a directory on disk.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            StoreError::new(StoreErrorKind::Io)
                .with_backend(BACKEND)
                .with_source(e)
        })?;
        tracing::debug!(root = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn file_name(key: &str) -> Result<String, StoreError> {
        if key.is_empty() {
            return Err(StoreError::new(StoreErrorKind::InvalidKey).with_backend(BACKEND));
        }
        Ok(utf8_percent_encode(key, NON_ALPHANUMERIC).to_string())
    }

    /// Exclusive lock on the directory, released when the file is dropped.
    fn lock(&self) -> Result<File, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.root.join(LOCK_FILE))
            .map_err(io_failed)?;
        file.lock().map_err(io_failed)?;
        Ok(file)
    }

    fn read_entry(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        let path = self.root.join(Self::file_name(key)?);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(e, key).with_backend(BACKEND)),
        };
        let Some((header, value)) = bytes.split_first_chunk::<HEADER_LEN>() else {
            return Err(StoreError::new(StoreErrorKind::Serialization)
                .with_key(key)
                .with_backend(BACKEND)
                .with_source(std::io::Error::other("truncated record header")));
        };
        Ok(Some(Entry {
            value: value.to_vec(),
            revision: u64::from_le_bytes(*header),
        }))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<Entry>, StoreError> {
        self.read_entry(key)
    }

    fn put(&self, key: &str, value: &[u8], expect: Expect) -> Result<Revision, StoreError> {
        let _lock = self.lock()?;

        let current = self.read_entry(key)?.map(|entry| entry.revision);
        let revision = next_revision(key, current, expect, BACKEND)?;

        let path = self.root.join(Self::file_name(key)?);
        let mut tmp = NamedTempFile::new_in(&self.root).map_err(io_failed)?;
        tmp.write_all(&revision.to_le_bytes())
            .and_then(|()| tmp.write_all(value))
            .map_err(io_failed)?;
        tmp.persist(&path).map_err(|e| io_failed(e.error))?;

        tracing::debug!(key, revision, "Stored record");
        Ok(revision)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let _lock = self.lock()?;
        let path = self.root.join(Self::file_name(key)?);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(e, key).with_backend(BACKEND)),
        }
    }
}

/// Write-side failures are plain I/O errors whatever their `ErrorKind`.
fn io_failed(err: std::io::Error) -> StoreError {
    StoreError::new(StoreErrorKind::Io)
        .with_backend(BACKEND)
        .with_source(err)
}
