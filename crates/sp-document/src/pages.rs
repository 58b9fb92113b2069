//! Page and image-library operations.

use sp_schema::{Element, HOME_PAGE_ID, ImageElement, Page};
use sp_store::Store;
use sp_tree::PageTree;
use uuid::Uuid;

use crate::controller::{Controller, Edit};
use crate::error::DocumentError;
use crate::snapshot::{PageView, Snapshot};

impl<S: Store> Controller<S> {
    /// Select a tree. `"home"` selects the home page.
    pub fn read_page(&self, post_id: &str, page_id: &str) -> Result<PageView, DocumentError> {
        let snapshot = self.load_document(post_id)?;
        PageView::select(&snapshot.document, page_id)
            .ok_or_else(|| DocumentError::PageNotFound(page_id.to_owned()))
    }

    /// Add an empty page in the document colors and return its new id.
    pub fn create_page(&self, post_id: &str) -> Result<String, DocumentError> {
        let page_id = Uuid::new_v4().to_string();
        self.mutate(post_id, "create_page", |mut document| {
            let page = Page::empty(page_id.clone(), &document.color);
            document.pages.insert(page_id.clone(), page);
            Ok(Edit::Write(document))
        })?;
        Ok(page_id)
    }

    /// Remove a page and everything on it. The home page cannot be removed.
    pub fn delete_page(&self, post_id: &str, page_id: &str) -> Result<Snapshot, DocumentError> {
        if page_id == HOME_PAGE_ID {
            return Err(DocumentError::PreconditionFailed(
                "the home page cannot be deleted".to_owned(),
            ));
        }
        self.mutate(post_id, "delete_page", |mut document| {
            if document.pages.remove(page_id).is_none() {
                return Err(DocumentError::PageNotFound(page_id.to_owned()));
            }
            Ok(Edit::Write(document))
        })
    }

    /// Every element of one tree, parents before children.
    pub fn flatten_page(&self, post_id: &str, page_id: &str) -> Result<Vec<Element>, DocumentError> {
        let view = self.read_page(post_id, page_id)?;
        Ok(view.page().flatten().into_iter().cloned().collect())
    }

    /// Insert or replace an entry of the image library, keyed by its id.
    pub fn put_image(&self, post_id: &str, image: ImageElement) -> Result<Snapshot, DocumentError> {
        self.mutate(post_id, "put_image", |mut document| {
            document.image_data.insert(image.id.clone(), image);
            Ok(Edit::Write(document))
        })
    }

    /// Drop an entry of the image library.
    pub fn remove_image(&self, post_id: &str, image_id: &str) -> Result<Snapshot, DocumentError> {
        let mode = self.options().mode();
        self.mutate(post_id, "remove_image", |mut document| {
            if document.image_data.remove(image_id).is_some() {
                Ok(Edit::Write(document))
            } else {
                Edit::missing(mode, image_id)
            }
        })
    }
}
