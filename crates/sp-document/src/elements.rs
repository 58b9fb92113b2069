//! Element operations.
//!
//! Find, update and delete address an element by id anywhere in the
//! document. Add and reorder address a parent inside one named tree; the
//! tree's own id selects its root.

use serde_json::Value;
use sp_schema::{Element, ElementKind, validate_element};
use sp_store::Store;
use sp_tree::DocumentTree;
use uuid::Uuid;

use crate::controller::{Controller, Edit};
use crate::error::DocumentError;
use crate::snapshot::{Added, Snapshot};

impl<S: Store> Controller<S> {
    /// First element with `id` in the home page or any page.
    pub fn find_element(&self, post_id: &str, id: &str) -> Result<Option<Element>, DocumentError> {
        let snapshot = self.load_document(post_id)?;
        let found = snapshot.document.find_element(id).cloned();
        if found.is_none() {
            Edit::missing(self.options().mode(), id)?;
        }
        Ok(found)
    }

    /// Replace the element `id` with a form submission.
    ///
    /// `raw` may omit `id` and `type`; both default to the current element's.
    /// Omitting `children` keeps the current children.
    pub fn update_element(
        &self,
        post_id: &str,
        id: &str,
        raw: &Value,
    ) -> Result<Snapshot, DocumentError> {
        let mode = self.options().mode();
        self.mutate(post_id, "update_element", |document| {
            let Some(kind) = document.find_element(id).map(Element::kind) else {
                return Edit::missing(mode, id);
            };
            let replacement = coerce(raw, id, Some(kind))?;
            Edit::from_rewrite(document.update_element(id, &replacement), mode, id)
        })
    }

    /// Remove the element `id` and its subtree.
    pub fn delete_element(&self, post_id: &str, id: &str) -> Result<Snapshot, DocumentError> {
        let mode = self.options().mode();
        self.mutate(post_id, "delete_element", |document| {
            Edit::from_rewrite(document.delete_element(id), mode, id)
        })
    }

    /// Append a form submission under `parent_id` in the tree `page_id`.
    ///
    /// `raw` must name its `type`; a missing `id` is generated.
    pub fn add_element(
        &self,
        post_id: &str,
        page_id: &str,
        parent_id: &str,
        raw: &Value,
    ) -> Result<Added, DocumentError> {
        let generated = Uuid::new_v4().to_string();
        let child = coerce(raw, &generated, None)?;
        let element_id = child.id().to_owned();

        let mode = self.options().mode();
        let mut added = false;
        let snapshot = self.mutate(post_id, "add_element", |document| {
            if document.tree(page_id).is_none() {
                return Err(DocumentError::PageNotFound(page_id.to_owned()));
            }
            let rewrite = document.add_child_in(page_id, parent_id, child);
            let edit = Edit::from_rewrite(rewrite, mode, parent_id)?;
            added = matches!(edit, Edit::Write(_));
            Ok(edit)
        })?;

        Ok(Added {
            element_id,
            added,
            snapshot,
        })
    }

    /// Rearrange the children of `parent_id` in the tree `page_id` to follow
    /// `order`. Children left out of `order` are removed.
    pub fn reorder_children<T: AsRef<str>>(
        &self,
        post_id: &str,
        page_id: &str,
        parent_id: &str,
        order: &[T],
    ) -> Result<Snapshot, DocumentError> {
        let mode = self.options().mode();
        self.mutate(post_id, "reorder_children", |document| {
            if document.tree(page_id).is_none() {
                return Err(DocumentError::PageNotFound(page_id.to_owned()));
            }
            Edit::from_rewrite(
                document.reorder_children_in(page_id, parent_id, order),
                mode,
                parent_id,
            )
        })
    }
}

/// Turn a form submission into a typed element.
///
/// Fills in `id` and, when known, `type` before validating.
fn coerce(raw: &Value, id: &str, kind: Option<ElementKind>) -> Result<Element, DocumentError> {
    let Value::Object(fields) = raw else {
        return Ok(validate_element(raw)?);
    };
    let mut fields = fields.clone();
    fields
        .entry("id")
        .or_insert_with(|| Value::String(id.to_owned()));
    if let Some(kind) = kind {
        fields
            .entry("type")
            .or_insert_with(|| Value::String(kind.tag().to_owned()));
    }
    Ok(validate_element(&Value::Object(fields))?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sp_store::MemoryStore;
    use sp_tree::TreeError;

    use super::*;
    use crate::{ControllerOptions, NewDocument};

    fn controller(strict: bool) -> Controller<MemoryStore> {
        let controller = Controller::new(MemoryStore::new(), ControllerOptions { strict });
        controller
            .create_document("post1", NewDocument::new("alice"))
            .unwrap();
        controller
    }

    fn add(controller: &Controller<MemoryStore>, page: &str, parent: &str, raw: &Value) -> String {
        controller
            .add_element("post1", page, parent, raw)
            .unwrap()
            .element_id
    }

    /// home: V1 [T1, T2]
    fn with_stack(strict: bool) -> Controller<MemoryStore> {
        let controller = controller(strict);
        add(&controller, "home", "home", &json!({ "type": "VStack", "id": "V1" }));
        add(&controller, "home", "V1", &json!({ "type": "Text", "id": "T1", "text": "one" }));
        add(&controller, "home", "V1", &json!({ "type": "Text", "id": "T2", "text": "two" }));
        controller
    }

    fn child_ids(element: &Element) -> Vec<&str> {
        element.children().iter().map(Element::id).collect()
    }

    #[test]
    fn test_add_to_page_root_and_stack() {
        let controller = with_stack(false);

        let v1 = controller.find_element("post1", "V1").unwrap().unwrap();

        assert_eq!(child_ids(&v1), vec!["T1", "T2"]);
        let home = controller.read_page("post1", "home").unwrap();
        assert!(home.is_home());
        assert_eq!(home.page().children.len(), 1);
    }

    #[test]
    fn test_add_generates_missing_id() {
        let controller = controller(false);

        let added = controller
            .add_element("post1", "home", "home", &json!({ "type": "Text", "text": "hi" }))
            .unwrap();

        assert!(added.added);
        let found = controller
            .find_element("post1", &added.element_id)
            .unwrap()
            .unwrap();
        assert_eq!(found, Element::text(added.element_id.clone(), "hi"));
    }

    #[test]
    fn test_add_under_missing_parent_is_noop() {
        let controller = controller(false);

        let added = controller
            .add_element("post1", "home", "home-root", &json!({ "type": "Text", "text": "x" }))
            .unwrap();

        assert!(!added.added);
        assert_eq!(added.snapshot.revision, 1);
        assert!(added.snapshot.document.home.children.is_empty());
    }

    #[test]
    fn test_add_under_leaf_is_noop() {
        let controller = with_stack(false);

        let added = controller
            .add_element("post1", "home", "T1", &json!({ "type": "Text", "text": "x" }))
            .unwrap();

        assert!(!added.added);
    }

    #[test]
    fn test_add_strict_missing_parent() {
        let controller = controller(true);

        let err = controller
            .add_element("post1", "home", "nope", &json!({ "type": "Text", "text": "x" }))
            .unwrap_err();

        assert!(matches!(err, DocumentError::Tree(TreeError::NotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_add_to_missing_page() {
        let controller = controller(false);

        let err = controller
            .add_element("post1", "p9", "p9", &json!({ "type": "Text", "text": "x" }))
            .unwrap_err();

        assert!(matches!(err, DocumentError::PageNotFound(id) if id == "p9"));
    }

    #[test]
    fn test_add_duplicate_id_rejected() {
        let controller = with_stack(false);

        let err = controller
            .add_element("post1", "home", "V1", &json!({ "type": "Text", "id": "T1", "text": "x" }))
            .unwrap_err();

        assert!(matches!(err, DocumentError::Validation(_)));
        let v1 = controller.find_element("post1", "V1").unwrap().unwrap();
        assert_eq!(child_ids(&v1), vec!["T1", "T2"]);
    }

    #[test]
    fn test_add_invalid_submission() {
        let controller = controller(false);

        let err = controller
            .add_element("post1", "home", "home", &json!({ "type": "Text" }))
            .unwrap_err();

        let DocumentError::Validation(err) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["text"]);
    }

    #[test]
    fn test_update_keeps_children_and_fills_type() {
        let controller = with_stack(false);

        controller
            .update_element("post1", "V1", &json!({ "gap": "8px" }))
            .unwrap();

        let v1 = controller.find_element("post1", "V1").unwrap().unwrap();
        assert_eq!(v1.kind(), ElementKind::VStack);
        assert_eq!(v1.stack().unwrap().gap.as_deref(), Some("8px"));
        assert_eq!(child_ids(&v1), vec!["T1", "T2"]);
    }

    #[test]
    fn test_update_on_another_page() {
        let controller = controller(false);
        let page_id = controller.create_page("post1").unwrap();
        add(&controller, &page_id, &page_id, &json!({ "type": "Text", "id": "T9", "text": "old" }));

        controller
            .update_element("post1", "T9", &json!({ "text": "new" }))
            .unwrap();

        let page = controller.read_page("post1", &page_id).unwrap().into_page();
        assert_eq!(page.children, vec![Element::text("T9", "new")]);
    }

    #[test]
    fn test_update_missing_lenient_writes_nothing() {
        let controller = with_stack(false);
        let before = controller.load_document("post1").unwrap();

        let after = controller
            .update_element("post1", "nope", &json!({ "text": "x" }))
            .unwrap();

        assert_eq!(after, before);
    }

    #[test]
    fn test_update_missing_strict() {
        let controller = with_stack(true);

        let err = controller
            .update_element("post1", "nope", &json!({ "text": "x" }))
            .unwrap_err();

        assert!(matches!(err, DocumentError::Tree(TreeError::NotFound(_))));
    }

    #[test]
    fn test_delete_container_removes_subtree() {
        let controller = with_stack(false);

        let snapshot = controller.delete_element("post1", "V1").unwrap();

        assert!(snapshot.document.home.children.is_empty());
        assert_eq!(controller.find_element("post1", "T1").unwrap(), None);
    }

    #[test]
    fn test_delete_missing_strict() {
        let controller = with_stack(true);
        let err = controller.delete_element("post1", "nope").unwrap_err();
        assert!(matches!(err, DocumentError::Tree(_)));
        assert!(matches!(
            controller.find_element("post1", "nope"),
            Err(DocumentError::Tree(_))
        ));
    }

    #[test]
    fn test_reorder_prunes_omitted() {
        let controller = controller(false);
        let page_id = controller.create_page("post1").unwrap();
        for id in ["A", "B", "C"] {
            add(&controller, &page_id, &page_id, &json!({ "type": "Text", "id": id, "text": id }));
        }

        let snapshot = controller
            .reorder_children("post1", &page_id, &page_id, &["C", "A"])
            .unwrap();

        let ids: Vec<&str> = snapshot.document.pages[&page_id]
            .children
            .iter()
            .map(Element::id)
            .collect();
        assert_eq!(ids, vec!["C", "A"]);
    }

    #[test]
    fn test_reorder_is_tree_scoped() {
        let controller = with_stack(false);
        let page_id = controller.create_page("post1").unwrap();

        let snapshot = controller
            .reorder_children("post1", &page_id, "V1", &["T2", "T1"])
            .unwrap();

        // V1 lives on home, so nothing on the other page matched.
        let v1 = controller.find_element("post1", "V1").unwrap().unwrap();
        assert_eq!(child_ids(&v1), vec!["T1", "T2"]);
        assert_eq!(snapshot.revision, controller.load_document("post1").unwrap().revision);
    }

    #[test]
    fn test_flatten_page() {
        let controller = with_stack(false);

        let flat = controller.flatten_page("post1", "home").unwrap();

        let ids: Vec<&str> = flat.iter().map(Element::id).collect();
        assert_eq!(ids, vec!["V1", "T1", "T2"]);
    }
}
