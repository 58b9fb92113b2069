//! The document controller and its document-level operations.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::{Map, Value};
use sp_schema::{
    AppInstance, HOME_PAGE_ID, Page, Status, ValidationError, merge_fields, validate_document,
};
use sp_store::{CONFIG_KEY, Entry, Expect, Slot, Store, StoreError, StoreExt};
use sp_tree::{Mode, Rewrite, TreeError};

use crate::app_config::AppConfig;
use crate::error::DocumentError;
use crate::snapshot::{NewDocument, Snapshot};

/// Behaviour switches for a [`Controller`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ControllerOptions {
    /// Report ids that match nothing instead of leaving the document unchanged.
    pub strict: bool,
}

impl ControllerOptions {
    pub(crate) fn mode(self) -> Mode {
        if self.strict { Mode::Strict } else { Mode::Lenient }
    }
}

/// Outcome of a transformation inside [`Controller::mutate`].
pub(crate) enum Edit {
    /// Write the new document.
    Write(AppInstance),
    /// Nothing changed; skip the write.
    Keep,
}

impl Edit {
    /// Turn a tree rewrite into an edit, honouring the lookup mode for `id`.
    pub(crate) fn from_rewrite(
        rewrite: Rewrite<AppInstance>,
        mode: Mode,
        id: &str,
    ) -> Result<Self, DocumentError> {
        if rewrite.matched {
            return Ok(Self::Write(rewrite.value));
        }
        Self::missing(mode, id)
    }

    /// Nothing matched `id`: keep the document, or fail in strict mode.
    pub(crate) fn missing(mode: Mode, id: &str) -> Result<Self, DocumentError> {
        match mode {
            Mode::Lenient => Ok(Self::Keep),
            Mode::Strict => Err(TreeError::NotFound(id.to_owned()).into()),
        }
    }
}

/// Load-transform-validate-save operations on per-post documents.
///
/// Holds no document state: every call names its post and returns a fresh
/// [`Snapshot`]. Saves carry the revision read at load time, so a concurrent
/// writer surfaces as [`DocumentError::Conflict`] rather than a lost update.
pub struct Controller<S: Store> {
    store: S,
    options: ControllerOptions,
}

impl<S: Store> Controller<S> {
    #[must_use]
    pub fn new(store: S, options: ControllerOptions) -> Self {
        Self { store, options }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn options(&self) -> ControllerOptions {
        self.options
    }

    /// Load the document stored for `post_id`.
    pub fn load_document(&self, post_id: &str) -> Result<Snapshot, DocumentError> {
        let slot = self.slot(post_id)?;
        let entry = slot
            .read()
            .map_err(|e| DocumentError::from_store(e, post_id))?;
        let document = decode(slot.key(), &entry)?;
        tracing::debug!(post_id, revision = entry.revision, "Loaded document");
        Ok(Snapshot {
            document,
            revision: entry.revision,
        })
    }

    /// Validate and store `document` over the existing record.
    pub fn save_document(
        &self,
        post_id: &str,
        document: &AppInstance,
    ) -> Result<Snapshot, DocumentError> {
        let slot = self.slot(post_id)?;
        let (document, bytes) = encode(slot.key(), document)?;
        let revision = slot
            .overwrite(&bytes)
            .map_err(|e| DocumentError::from_store(e, post_id))?;
        tracing::info!(post_id, revision, "Saved document");
        Ok(Snapshot { document, revision })
    }

    /// Create the document for `post_id`.
    ///
    /// Fields left unset in `new` come from the `config` record.
    pub fn create_document(
        &self,
        post_id: &str,
        new: NewDocument,
    ) -> Result<Snapshot, DocumentError> {
        let slot = self.slot(post_id)?;
        if slot
            .exists()
            .map_err(|e| DocumentError::from_store(e, post_id))?
        {
            tracing::warn!(post_id, "Document already exists");
            return Err(DocumentError::AlreadyExists(post_id.to_owned()));
        }

        let defaults = self.read_config()?;
        let color = new.color.unwrap_or(defaults.default_color);
        let document = AppInstance {
            status: Status::Draft,
            url: None,
            created_at: Utc::now(),
            owners: vec![new.created_by.clone()],
            created_by: new.created_by,
            home: Page::empty(HOME_PAGE_ID, &color),
            color,
            title: new.title.unwrap_or(defaults.default_title),
            header: new.header.unwrap_or(defaults.default_header),
            subheader: new.subheader.unwrap_or(defaults.default_subheader),
            image_data: BTreeMap::new(),
            pages: BTreeMap::new(),
        };

        let (document, bytes) = encode(slot.key(), &document)?;
        let revision = slot
            .create(&bytes)
            .map_err(|e| DocumentError::from_store(e, post_id))?;
        tracing::info!(post_id, created_by = %document.created_by, "Created document");
        Ok(Snapshot { document, revision })
    }

    /// Copy the document of `source_post_id` verbatim to `target_post_id`.
    ///
    /// Element and page ids are kept as they are.
    pub fn clone_document(
        &self,
        source_post_id: &str,
        target_post_id: &str,
    ) -> Result<Snapshot, DocumentError> {
        let source = self.load_document(source_post_id)?;
        let target = self.slot(target_post_id)?;
        let (document, bytes) = encode(target.key(), &source.document)?;
        let revision = target
            .create(&bytes)
            .map_err(|e| DocumentError::from_store(e, target_post_id))?;
        tracing::info!(
            source = source_post_id,
            target = target_post_id,
            "Cloned document"
        );
        Ok(Snapshot { document, revision })
    }

    /// Shallow-merge `partial` over the top-level fields.
    ///
    /// Nested values (`home`, `pages`, `color`, ...) are replaced wholesale.
    /// A live document cannot be moved back to draft.
    pub fn update_document_fields(
        &self,
        post_id: &str,
        partial: &Map<String, Value>,
    ) -> Result<Snapshot, DocumentError> {
        self.mutate(post_id, "update_fields", |document| {
            let merged = merge_fields(&document, partial)?;
            if document.status == Status::Live && merged.status == Status::Draft {
                return Err(DocumentError::PreconditionFailed(
                    "a live document cannot return to draft".to_owned(),
                ));
            }
            Ok(Edit::Write(merged))
        })
    }

    /// Move a draft document live at `url`.
    pub fn publish(&self, post_id: &str, url: &str) -> Result<Snapshot, DocumentError> {
        if url.trim().is_empty() {
            return Err(ValidationError::single("url", "must not be empty").into());
        }
        self.mutate(post_id, "publish", |mut document| {
            if document.status == Status::Live {
                return Err(DocumentError::PreconditionFailed(
                    "document is already live".to_owned(),
                ));
            }
            document.status = Status::Live;
            document.url = Some(url.to_owned());
            Ok(Edit::Write(document))
        })
    }

    /// Grant `username` edit rights. Existing owners are left as they are.
    pub fn add_owner(&self, post_id: &str, username: &str) -> Result<Snapshot, DocumentError> {
        self.mutate(post_id, "add_owner", |mut document| {
            if document.is_owner(username) {
                return Ok(Edit::Keep);
            }
            document.owners.push(username.to_owned());
            Ok(Edit::Write(document))
        })
    }

    /// Revoke `username`'s edit rights. The last owner cannot be removed.
    pub fn remove_owner(&self, post_id: &str, username: &str) -> Result<Snapshot, DocumentError> {
        self.mutate(post_id, "remove_owner", |mut document| {
            if !document.is_owner(username) {
                return Ok(Edit::Keep);
            }
            if document.owners.len() == 1 {
                tracing::warn!(post_id, username, "Refused to remove last owner");
                return Err(DocumentError::PreconditionFailed(format!(
                    "cannot remove {username}: a document needs at least one owner"
                )));
            }
            document.owners.retain(|owner| owner != username);
            Ok(Edit::Write(document))
        })
    }

    /// Fail unless `username` owns the document.
    pub fn check_owner(&self, post_id: &str, username: &str) -> Result<(), DocumentError> {
        if self.load_document(post_id)?.document.is_owner(username) {
            Ok(())
        } else {
            Err(DocumentError::PreconditionFailed(format!(
                "{username} is not an owner of {post_id}"
            )))
        }
    }

    /// Read the `config` record, or defaults when it was never written.
    pub fn read_config(&self) -> Result<AppConfig, DocumentError> {
        let config = self
            .store
            .get_json::<AppConfig>(CONFIG_KEY)
            .map_err(DocumentError::Store)?
            .map(|(config, _)| config)
            .unwrap_or_default();
        Ok(config)
    }

    /// Replace the `config` record.
    pub fn write_config(&self, config: &AppConfig) -> Result<(), DocumentError> {
        let revision = self
            .store
            .put_json(CONFIG_KEY, config, Expect::Any)
            .map_err(DocumentError::Store)?;
        tracing::info!(revision, "Saved config");
        Ok(())
    }

    pub(crate) fn slot(&self, post_id: &str) -> Result<Slot<'_, S>, DocumentError> {
        Slot::document(&self.store, post_id).map_err(DocumentError::Store)
    }

    /// Run one load → transform → validate → save cycle.
    ///
    /// The save is conditional on the loaded revision. When `transform`
    /// returns [`Edit::Keep`] nothing is written and the loaded snapshot is
    /// returned.
    pub(crate) fn mutate<F>(
        &self,
        post_id: &str,
        operation: &'static str,
        transform: F,
    ) -> Result<Snapshot, DocumentError>
    where
        F: FnOnce(AppInstance) -> Result<Edit, DocumentError>,
    {
        let slot = self.slot(post_id)?;
        let entry = slot
            .read()
            .map_err(|e| DocumentError::from_store(e, post_id))?;
        let loaded = decode(slot.key(), &entry)?;

        let updated = match transform(loaded.clone())? {
            Edit::Write(updated) => updated,
            Edit::Keep => {
                tracing::debug!(post_id, operation, "Nothing to change");
                return Ok(Snapshot {
                    document: loaded,
                    revision: entry.revision,
                });
            }
        };

        let (document, bytes) = encode(slot.key(), &updated)?;
        let revision = slot
            .update(&bytes, entry.revision)
            .map_err(|e| DocumentError::from_store(e, post_id))?;
        tracing::info!(post_id, operation, revision, "Updated document");
        Ok(Snapshot { document, revision })
    }
}

/// Parse and validate a stored document.
fn decode(key: &str, entry: &Entry) -> Result<AppInstance, DocumentError> {
    let value: Value = serde_json::from_slice(&entry.value)
        .map_err(|e| DocumentError::Store(StoreError::json(e, key)))?;
    Ok(validate_document(&value)?)
}

/// Validate `document` and serialize it for the store.
fn encode(key: &str, document: &AppInstance) -> Result<(AppInstance, Vec<u8>), DocumentError> {
    let json = |e| DocumentError::Store(StoreError::json(e, key));
    let value = serde_json::to_value(document).map_err(json)?;
    let document = validate_document(&value)?;
    let bytes = serde_json::to_vec(&value).map_err(json)?;
    Ok((document, bytes))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sp_schema::ThemeColor;
    use sp_store::{MemoryStore, Revision, StoreErrorKind};

    use super::*;

    fn controller() -> Controller<MemoryStore> {
        Controller::new(MemoryStore::new(), ControllerOptions::default())
    }

    fn with_document(post_id: &str) -> Controller<MemoryStore> {
        let controller = controller();
        controller
            .create_document(post_id, NewDocument::new("alice").title("Hello"))
            .unwrap();
        controller
    }

    #[test]
    fn test_create_document_defaults() {
        let controller = controller();

        let snapshot = controller
            .create_document("post1", NewDocument::new("alice"))
            .unwrap();

        let doc = &snapshot.document;
        assert_eq!(snapshot.revision, 1);
        assert_eq!(doc.status, Status::Draft);
        assert_eq!(doc.owners, vec!["alice".to_owned()]);
        assert_eq!(doc.created_by, "alice");
        assert_eq!(doc.title, "Untitled");
        assert_eq!(doc.home.id, "home");
        assert_eq!(doc.home.light, ThemeColor::default().light);
        assert!(doc.pages.is_empty());
    }

    #[test]
    fn test_create_document_uses_config_record() {
        let controller = controller();
        let config = AppConfig {
            default_title: "Links".to_owned(),
            default_color: ThemeColor {
                light: "#EEEEEE".to_owned(),
                dark: None,
            },
            ..AppConfig::default()
        };
        controller.write_config(&config).unwrap();

        let doc = controller
            .create_document("post1", NewDocument::new("alice"))
            .unwrap()
            .document;

        assert_eq!(doc.title, "Links");
        assert_eq!(doc.color.light, "#EEEEEE");
        assert_eq!(doc.home.dark, None);
    }

    #[test]
    fn test_create_twice_keeps_original() {
        let controller = with_document("post1");
        let before = controller.load_document("post1").unwrap();

        let err = controller
            .create_document("post1", NewDocument::new("bob").title("Other"))
            .unwrap_err();

        assert!(matches!(err, DocumentError::AlreadyExists(id) if id == "post1"));
        assert_eq!(controller.load_document("post1").unwrap(), before);
    }

    #[test]
    fn test_create_with_blank_creator_is_invalid() {
        let controller = controller();

        let err = controller
            .create_document("post1", NewDocument::new(" "))
            .unwrap_err();

        assert!(matches!(err, DocumentError::Validation(_)));
        assert!(controller.store().is_empty());
    }

    #[test]
    fn test_load_missing_document() {
        let err = controller().load_document("nope").unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(id) if id == "nope"));
    }

    #[test]
    fn test_load_rejects_corrupt_record() {
        let store = MemoryStore::new().with_entry("document:post1", r#"{"title": 3}"#);
        let controller = Controller::new(store, ControllerOptions::default());

        let err = controller.load_document("post1").unwrap_err();

        assert!(matches!(err, DocumentError::Validation(_)));
    }

    #[test]
    fn test_save_round_trips() {
        let controller = with_document("post1");
        let mut doc = controller.load_document("post1").unwrap().document;
        doc.header = "Welcome".to_owned();

        let saved = controller.save_document("post1", &doc).unwrap();

        assert_eq!(saved.revision, 2);
        assert_eq!(controller.load_document("post1").unwrap().document, doc);
    }

    #[test]
    fn test_save_requires_existing_document() {
        let controller = with_document("post1");
        let doc = controller.load_document("post1").unwrap().document;

        let err = controller.save_document("post2", &doc).unwrap_err();

        assert!(matches!(err, DocumentError::NotFound(_)));
    }

    #[test]
    fn test_save_invalid_document_writes_nothing() {
        let controller = with_document("post1");
        let mut doc = controller.load_document("post1").unwrap().document;
        doc.owners.clear();

        let err = controller.save_document("post1", &doc).unwrap_err();

        assert!(matches!(err, DocumentError::Validation(_)));
        assert_eq!(controller.load_document("post1").unwrap().revision, 1);
    }

    #[test]
    fn test_clone_document() {
        let controller = with_document("post1");

        let clone = controller.clone_document("post1", "post2").unwrap();

        assert_eq!(
            clone.document,
            controller.load_document("post1").unwrap().document
        );
        let err = controller.clone_document("post1", "post2").unwrap_err();
        assert!(matches!(err, DocumentError::AlreadyExists(id) if id == "post2"));
    }

    #[test]
    fn test_update_fields_shallow_merge() {
        let controller = with_document("post1");
        let partial = json!({ "title": "Renamed", "color": { "light": "#000000" } });

        let doc = controller
            .update_document_fields("post1", partial.as_object().unwrap())
            .unwrap()
            .document;

        assert_eq!(doc.title, "Renamed");
        assert_eq!(
            doc.color,
            ThemeColor {
                light: "#000000".to_owned(),
                dark: None
            }
        );
        assert_eq!(doc.owners, vec!["alice".to_owned()]);
    }

    #[test]
    fn test_update_fields_reports_every_path() {
        let controller = with_document("post1");
        let partial = json!({ "title": 1, "bogus": true });

        let err = controller
            .update_document_fields("post1", partial.as_object().unwrap())
            .unwrap_err();

        let DocumentError::Validation(err) = err else {
            panic!("expected validation error, got {err:?}");
        };
        let mut paths: Vec<&str> = err.paths().collect();
        paths.sort_unstable();
        assert_eq!(paths, vec!["bogus", "title"]);
    }

    #[test]
    fn test_home_page_cannot_be_renamed() {
        let controller = with_document("post1");
        let partial = json!({
            "home": { "id": "root", "light": "#FFFFFF", "children": [] }
        });

        let err = controller
            .update_document_fields("post1", partial.as_object().unwrap())
            .unwrap_err();

        let DocumentError::Validation(err) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["home.id"]);
        assert_eq!(controller.load_document("post1").unwrap().revision, 1);
    }

    #[test]
    fn test_live_cannot_return_to_draft() {
        let controller = with_document("post1");
        controller.publish("post1", "https://example.com/p/1").unwrap();
        let partial = json!({ "status": "draft" });

        let err = controller
            .update_document_fields("post1", partial.as_object().unwrap())
            .unwrap_err();

        assert!(matches!(err, DocumentError::PreconditionFailed(_)));
    }

    #[test]
    fn test_publish() {
        let controller = with_document("post1");

        let doc = controller
            .publish("post1", "https://example.com/p/1")
            .unwrap()
            .document;

        assert_eq!(doc.status, Status::Live);
        assert_eq!(doc.url.as_deref(), Some("https://example.com/p/1"));
        assert!(matches!(
            controller.publish("post1", "https://example.com/p/1"),
            Err(DocumentError::PreconditionFailed(_))
        ));
    }

    #[test]
    fn test_publish_requires_url() {
        let controller = with_document("post1");
        let err = controller.publish("post1", "").unwrap_err();
        assert!(matches!(err, DocumentError::Validation(_)));
    }

    #[test]
    fn test_remove_last_owner_refused() {
        let controller = with_document("post1");

        let err = controller.remove_owner("post1", "alice").unwrap_err();

        assert!(matches!(err, DocumentError::PreconditionFailed(_)));
        let doc = controller.load_document("post1").unwrap().document;
        assert_eq!(doc.owners, vec!["alice".to_owned()]);
    }

    #[test]
    fn test_add_and_remove_owner() {
        let controller = with_document("post1");

        let added = controller.add_owner("post1", "bob").unwrap();
        assert_eq!(
            added.document.owners,
            vec!["alice".to_owned(), "bob".to_owned()]
        );

        // Adding again writes nothing.
        let again = controller.add_owner("post1", "bob").unwrap();
        assert_eq!(again.revision, added.revision);

        let removed = controller.remove_owner("post1", "alice").unwrap();
        assert_eq!(removed.document.owners, vec!["bob".to_owned()]);
        assert!(controller.check_owner("post1", "bob").is_ok());
        assert!(controller.check_owner("post1", "alice").is_err());
    }

    #[test]
    fn test_blank_owner_rejected() {
        let controller = with_document("post1");
        let err = controller.add_owner("post1", "").unwrap_err();
        assert!(matches!(err, DocumentError::Validation(_)));
    }

    #[test]
    fn test_read_config_defaults_when_absent() {
        assert_eq!(controller().read_config().unwrap(), AppConfig::default());
    }

    /// Store that lets another writer in right before the first conditional put.
    struct RacingStore {
        inner: MemoryStore,
        raced: AtomicBool,
    }

    impl Store for RacingStore {
        fn get(&self, key: &str) -> Result<Option<Entry>, StoreError> {
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: &[u8], expect: Expect) -> Result<Revision, StoreError> {
            if matches!(expect, Expect::Revision(_)) && !self.raced.swap(true, Ordering::SeqCst) {
                self.inner.set(key, value)?;
            }
            self.inner.put(key, value, expect)
        }

        fn delete(&self, key: &str) -> Result<bool, StoreError> {
            self.inner.delete(key)
        }
    }

    #[test]
    fn test_concurrent_write_is_conflict() {
        let store = RacingStore {
            inner: MemoryStore::new(),
            raced: AtomicBool::new(false),
        };
        let controller = Controller::new(store, ControllerOptions::default());
        controller
            .create_document("post1", NewDocument::new("alice"))
            .unwrap();

        let err = controller.add_owner("post1", "bob").unwrap_err();

        assert!(matches!(err, DocumentError::Conflict(id) if id == "post1"));
        // A retry reads the new revision and goes through.
        assert!(controller.add_owner("post1", "carol").is_ok());
    }

    #[test]
    fn test_blank_post_id_is_store_error() {
        let err = controller().load_document("").unwrap_err();
        let DocumentError::Store(err) = err else {
            panic!("expected store error, got {err:?}");
        };
        assert_eq!(err.kind(), StoreErrorKind::InvalidKey);
    }
}
