//! Error type for document controller operations.

use sp_schema::ValidationError;
use sp_store::{StoreError, StoreErrorKind};
use sp_tree::TreeError;

/// Error from [`Controller`](crate::Controller) operations.
///
/// Nothing is written when an operation fails.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// No document is stored for the post.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The document has no page with this id.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// A document is already stored for the post.
    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    /// The result would not be a valid document, or the input is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The operation is refused in the document's current state.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// The document was written by someone else between load and save.
    #[error("Document was modified concurrently: {0}")]
    Conflict(String),

    /// A strict-mode lookup matched nothing.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Store failure with no document-level meaning.
    #[error(transparent)]
    Store(StoreError),
}

impl DocumentError {
    /// Map a store error raised while accessing `post_id`'s record.
    pub(crate) fn from_store(err: StoreError, post_id: &str) -> Self {
        match err.kind() {
            StoreErrorKind::NotFound => Self::NotFound(post_id.to_owned()),
            StoreErrorKind::AlreadyExists => Self::AlreadyExists(post_id.to_owned()),
            StoreErrorKind::Conflict => Self::Conflict(post_id.to_owned()),
            _ => Self::Store(err),
        }
    }
}
