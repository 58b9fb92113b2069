//! Validation of untyped JSON into the typed model.
//!
//! Serde stops at the first mismatch, which is not enough for an editor that
//! has to tell a moderator everything wrong with a submission. The checker
//! here walks the raw [`Value`] first and collects every offending field path;
//! only a clean value is handed to serde for the typed conversion.
//!
//! Paths use dots for object keys and brackets for array indices, e.g.
//! `home.children[0].children[2].text` or `pages.about.light`.

use std::collections::HashMap;
use std::fmt;

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::document::{AppInstance, HOME_PAGE_ID};
use crate::element::{Element, ElementKind};

/// A single offending field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    /// Field path; empty for the value itself.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "<root>: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every issue found in a candidate value. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", list(.issues))]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    /// Error with a single issue.
    #[must_use]
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![Issue {
                path: path.into(),
                message: message.into(),
            }],
        }
    }

    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Paths of all issues, in discovery order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|issue| issue.path.as_str())
    }
}

fn list(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a whole document.
///
/// Unknown top-level fields are rejected. Element ids must be unique across
/// the home page and every page.
pub fn validate_document(value: &Value) -> Result<AppInstance, ValidationError> {
    let mut checker = Checker::default();
    checker.document(value);
    checker.finish()?;
    serde_json::from_value(value.clone()).map_err(|e| ValidationError::single("", e.to_string()))
}

/// Validate a single element (and its subtree), e.g. a form submission.
///
/// Absent optional attributes are fine; unknown attributes are dropped.
pub fn validate_element(value: &Value) -> Result<Element, ValidationError> {
    let mut checker = Checker::default();
    checker.element(value, "");
    checker.finish()?;
    serde_json::from_value(value.clone()).map_err(|e| ValidationError::single("", e.to_string()))
}

/// Shallow-merge `partial` over the top-level fields of `document` and
/// re-validate the merged result.
///
/// Nested values are replaced wholesale, never deep-merged.
pub fn merge_fields(
    document: &AppInstance,
    partial: &Map<String, Value>,
) -> Result<AppInstance, ValidationError> {
    let Ok(Value::Object(mut merged)) = serde_json::to_value(document) else {
        return Err(ValidationError::single(
            "",
            "document does not serialize to an object",
        ));
    };
    for (key, value) in partial {
        merged.insert(key.clone(), value.clone());
    }
    validate_document(&Value::Object(merged))
}

const DOCUMENT_FIELDS: [&str; 12] = [
    "status",
    "url",
    "createdAt",
    "createdBy",
    "owners",
    "color",
    "title",
    "header",
    "subheader",
    "imageData",
    "home",
    "pages",
];

#[derive(Clone, Copy)]
enum FieldType {
    Str,
    UInt,
    Bool,
}

struct Field {
    name: &'static str,
    ty: FieldType,
    required: bool,
}

const fn req(name: &'static str) -> Field {
    Field {
        name,
        ty: FieldType::Str,
        required: true,
    }
}

const fn opt(name: &'static str, ty: FieldType) -> Field {
    Field {
        name,
        ty,
        required: false,
    }
}

const IMAGE_FIELDS: &[Field] = &[
    req("url"),
    opt("imageWidth", FieldType::UInt),
    opt("imageHeight", FieldType::UInt),
    opt("resizeMode", FieldType::Str),
    opt("width", FieldType::Str),
    opt("height", FieldType::Str),
    opt("description", FieldType::Str),
];

const TEXT_FIELDS: &[Field] = &[
    req("text"),
    opt("size", FieldType::Str),
    opt("weight", FieldType::Str),
    opt("color", FieldType::Str),
    opt("alignment", FieldType::Str),
    opt("style", FieldType::Str),
    opt("wrap", FieldType::Bool),
];

const BUTTON_FIELDS: &[Field] = &[
    req("text"),
    opt("url", FieldType::Str),
    opt("pageId", FieldType::Str),
    opt("size", FieldType::Str),
    opt("appearance", FieldType::Str),
    opt("icon", FieldType::Str),
    opt("width", FieldType::Str),
];

const PAGINATION_FIELDS: &[Field] = &[
    req("text"),
    req("pageId"),
    opt("appearance", FieldType::Str),
    opt("size", FieldType::Str),
];

const PLUG_FIELDS: &[Field] = &[
    req("title"),
    opt("subtitle", FieldType::Str),
    opt("url", FieldType::Str),
    opt("imageUrl", FieldType::Str),
];

const STACK_FIELDS: &[Field] = &[
    opt("gap", FieldType::Str),
    opt("alignment", FieldType::Str),
    opt("padding", FieldType::Str),
    opt("width", FieldType::Str),
    opt("height", FieldType::Str),
    opt("backgroundColor", FieldType::Str),
    opt("cornerRadius", FieldType::Str),
];

fn element_fields(kind: ElementKind) -> &'static [Field] {
    match kind {
        ElementKind::Image => IMAGE_FIELDS,
        ElementKind::Text => TEXT_FIELDS,
        ElementKind::Button => BUTTON_FIELDS,
        ElementKind::PaginationButton => PAGINATION_FIELDS,
        ElementKind::PersonalPlug => PLUG_FIELDS,
        ElementKind::VStack | ElementKind::HStack | ElementKind::ZStack => STACK_FIELDS,
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{path}.{key}")
    }
}

fn index(path: &str, i: usize) -> String {
    format!("{path}[{i}]")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Accumulates issues while walking a candidate value.
#[derive(Default)]
struct Checker {
    issues: Vec<Issue>,
    /// Element id to the path where it was first seen.
    ids: HashMap<String, String>,
}

impl Checker {
    fn issue(&mut self, path: &str, message: impl Into<String>) {
        self.issues.push(Issue {
            path: path.to_owned(),
            message: message.into(),
        });
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        if let Value::Object(map) = value {
            Some(map)
        } else {
            self.issue(path, format!("expected an object, got {}", type_name(value)));
            None
        }
    }

    fn required<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<&'v Value> {
        let value = obj.get(key);
        if value.is_none() {
            self.issue(&join(path, key), "missing required field");
        }
        value
    }

    /// Required string; `non_empty` additionally rejects `""` and whitespace.
    fn string<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        path: &str,
        non_empty: bool,
    ) -> Option<&'v str> {
        let value = self.required(obj, key, path)?;
        match value {
            Value::String(s) if non_empty && s.trim().is_empty() => {
                self.issue(&join(path, key), "must not be empty");
                None
            }
            Value::String(s) => Some(s.as_str()),
            other => {
                self.issue(
                    &join(path, key),
                    format!("expected a string, got {}", type_name(other)),
                );
                None
            }
        }
    }

    /// Check one declared field. Optional fields may be absent or null.
    fn field(&mut self, obj: &Map<String, Value>, field: &Field, path: &str) {
        let value = match obj.get(field.name) {
            None | Some(Value::Null) if !field.required => return,
            None => {
                self.issue(&join(path, field.name), "missing required field");
                return;
            }
            Some(value) => value,
        };
        let ok = match field.ty {
            FieldType::Str => value.is_string(),
            FieldType::Bool => value.is_boolean(),
            FieldType::UInt => value.as_u64().is_some_and(|n| u32::try_from(n).is_ok()),
        };
        if !ok {
            let expected = match field.ty {
                FieldType::Str => "a string",
                FieldType::Bool => "a boolean",
                FieldType::UInt => "a non-negative integer",
            };
            self.issue(
                &join(path, field.name),
                format!("expected {expected}, got {}", type_name(value)),
            );
        }
    }

    fn claim_id(&mut self, id: &str, path: &str) {
        if let Some(first) = self.ids.get(id) {
            let message = format!("duplicate element id `{id}` (first used at {first})");
            self.issue(&join(path, "id"), message);
        } else {
            self.ids.insert(id.to_owned(), path.to_owned());
        }
    }

    /// `id` and `order`, shared by every element.
    fn element_base<'v>(&mut self, obj: &'v Map<String, Value>, path: &str) -> Option<&'v str> {
        self.field(obj, &opt("order", FieldType::UInt), path);
        self.string(obj, "id", path, true)
    }

    fn element(&mut self, value: &Value, path: &str) {
        let Some(obj) = self.object(value, path) else {
            return;
        };
        let type_path = join(path, "type");
        let kind = match obj.get("type") {
            Some(Value::String(tag)) => {
                if let Some(kind) = ElementKind::from_tag(tag) {
                    kind
                } else {
                    self.issue(&type_path, format!("unknown element type `{tag}`"));
                    return;
                }
            }
            Some(other) => {
                let message = format!("expected a string, got {}", type_name(other));
                self.issue(&type_path, message);
                return;
            }
            None => {
                self.issue(&type_path, "missing required field");
                return;
            }
        };

        if let Some(id) = self.element_base(obj, path) {
            self.claim_id(id, path);
        }
        for field in element_fields(kind) {
            self.field(obj, field, path);
        }

        if kind.is_container() {
            match obj.get("children") {
                None | Some(Value::Null) => {}
                Some(Value::Array(children)) => {
                    let base = join(path, "children");
                    for (i, child) in children.iter().enumerate() {
                        self.element(child, &index(&base, i));
                    }
                }
                Some(other) => {
                    let message = format!("expected an array, got {}", type_name(other));
                    self.issue(&join(path, "children"), message);
                }
            }
        }
    }

    fn image_entry(&mut self, key: &str, value: &Value, path: &str) {
        let Some(obj) = self.object(value, path) else {
            return;
        };
        match obj.get("type") {
            None => {}
            Some(Value::String(tag)) if tag == ElementKind::Image.tag() => {}
            Some(other) => self.issue(
                &join(path, "type"),
                format!("image data entries must be images, got {other}"),
            ),
        }
        if let Some(id) = self.element_base(obj, path)
            && id != key
        {
            let message = format!("image id `{id}` does not match its key `{key}`");
            self.issue(&join(path, "id"), message);
        }
        for field in IMAGE_FIELDS {
            self.field(obj, field, path);
        }
    }

    fn page<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v str> {
        let obj = self.object(value, path)?;
        let id = self.string(obj, "id", path, true);
        self.string(obj, "light", path, false);
        self.field(obj, &opt("dark", FieldType::Str), path);
        if let Some(children) = self.required(obj, "children", path) {
            let base = join(path, "children");
            if let Value::Array(items) = children {
                for (i, child) in items.iter().enumerate() {
                    self.element(child, &index(&base, i));
                }
            } else {
                let message = format!("expected an array, got {}", type_name(children));
                self.issue(&base, message);
            }
        }
        id
    }

    fn owners(&mut self, obj: &Map<String, Value>) {
        let Some(value) = self.required(obj, "owners", "") else {
            return;
        };
        let Value::Array(owners) = value else {
            self.issue(
                "owners",
                format!("expected an array, got {}", type_name(value)),
            );
            return;
        };
        if owners.is_empty() {
            self.issue("owners", "at least one owner is required");
        }
        let mut seen: Vec<&str> = Vec::with_capacity(owners.len());
        for (i, owner) in owners.iter().enumerate() {
            let path = index("owners", i);
            match owner {
                Value::String(name) if name.trim().is_empty() => {
                    self.issue(&path, "must not be empty");
                }
                Value::String(name) if seen.contains(&name.as_str()) => {
                    self.issue(&path, format!("duplicate owner `{name}`"));
                }
                Value::String(name) => seen.push(name),
                other => {
                    let message = format!("expected a string, got {}", type_name(other));
                    self.issue(&path, message);
                }
            }
        }
    }

    fn document(&mut self, value: &Value) {
        let Some(obj) = self.object(value, "") else {
            return;
        };

        for key in obj.keys() {
            if !DOCUMENT_FIELDS.contains(&key.as_str()) {
                self.issue(key, "unknown field");
            }
        }

        if let Some(status) = self.string(obj, "status", "", false)
            && status != "draft"
            && status != "live"
        {
            self.issue(
                "status",
                format!("expected `draft` or `live`, got `{status}`"),
            );
        }
        self.field(obj, &opt("url", FieldType::Str), "");
        if let Some(created_at) = self.string(obj, "createdAt", "", false)
            && let Err(e) = DateTime::parse_from_rfc3339(created_at)
        {
            self.issue("createdAt", format!("invalid RFC 3339 timestamp: {e}"));
        }
        self.string(obj, "createdBy", "", true);
        self.owners(obj);

        if let Some(color) = self.required(obj, "color", "")
            && let Some(color) = self.object(color, "color")
        {
            self.string(color, "light", "color", false);
            self.field(color, &opt("dark", FieldType::Str), "color");
        }

        for key in ["title", "header", "subheader"] {
            self.string(obj, key, "", false);
        }

        if let Some(images) = self.required(obj, "imageData", "")
            && let Some(images) = self.object(images, "imageData")
        {
            for (key, image) in images {
                self.image_entry(key, image, &join("imageData", key));
            }
        }

        if let Some(home) = self.required(obj, "home", "")
            && let Some(id) = self.page(home, "home")
            && id != HOME_PAGE_ID
        {
            self.issue("home.id", format!("expected `{HOME_PAGE_ID}`, got `{id}`"));
        }

        if let Some(pages) = self.required(obj, "pages", "")
            && let Some(pages) = self.object(pages, "pages")
        {
            for (key, page) in pages {
                let path = join("pages", key);
                if key == HOME_PAGE_ID {
                    self.issue(&path, "`home` is reserved for the home page");
                }
                if let Some(id) = self.page(page, &path)
                    && id != key
                {
                    let message = format!("page id `{id}` does not match its key `{key}`");
                    self.issue(&join(&path, "id"), message);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::element::StackElement;

    fn valid_document() -> Value {
        json!({
            "status": "draft",
            "url": null,
            "createdAt": "2024-05-01T12:00:00Z",
            "createdBy": "alice",
            "owners": ["alice"],
            "color": { "light": "#FFFFFF", "dark": null },
            "title": "Welcome",
            "header": "Hello",
            "subheader": "",
            "imageData": {
                "img1": { "id": "img1", "url": "https://i.example/1.png", "imageWidth": 640 }
            },
            "home": {
                "id": "home",
                "light": "#FFFFFF",
                "dark": "#000000",
                "children": [
                    { "type": "VStack", "id": "v1", "children": [
                        { "type": "Text", "id": "t1", "text": "Hi" }
                    ] }
                ]
            },
            "pages": {
                "p1": { "id": "p1", "light": "#EEEEEE", "dark": null, "children": [
                    { "type": "PaginationButton", "id": "b1", "text": "Back", "pageId": "home" }
                ] }
            }
        })
    }

    #[test]
    fn test_valid_document() {
        let doc = validate_document(&valid_document()).unwrap();
        assert_eq!(doc.owners, vec!["alice".to_owned()]);
        assert_eq!(doc.home.children[0].children()[0].id(), "t1");
        assert_eq!(doc.image_data["img1"].image_width, Some(640));
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let doc = validate_document(&valid_document()).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(validate_document(&value).unwrap(), doc);
    }

    #[test]
    fn test_url_may_be_absent() {
        let mut value = valid_document();
        value.as_object_mut().unwrap().remove("url");
        assert_eq!(validate_document(&value).unwrap().url, None);
    }

    #[test]
    fn test_unknown_top_level_field_rejected() {
        let mut value = valid_document();
        value["version"] = json!(3);

        let err = validate_document(&value).unwrap_err();

        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["version"]);
    }

    #[test]
    fn test_reports_every_issue() {
        let mut value = valid_document();
        value["status"] = json!("archived");
        value["owners"] = json!([]);
        value["home"]["children"][0]["children"][0]["text"] = json!(7);
        value["pages"]["p1"]["light"] = json!(null);

        let err = validate_document(&value).unwrap_err();

        assert_eq!(
            err.paths().collect::<Vec<_>>(),
            vec![
                "status",
                "owners",
                "home.children[0].children[0].text",
                "pages.p1.light",
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_across_trees() {
        let mut value = valid_document();
        value["pages"]["p1"]["children"][0]["id"] = json!("t1");

        let err = validate_document(&value).unwrap_err();

        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].path, "pages.p1.children[0].id");
        assert!(err.issues()[0].message.contains("home.children[0].children[0]"));
    }

    #[test]
    fn test_page_key_must_match_id() {
        let mut value = valid_document();
        value["pages"]["p1"]["id"] = json!("p2");

        let err = validate_document(&value).unwrap_err();

        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["pages.p1.id"]);
    }

    #[test]
    fn test_home_id_is_fixed() {
        let mut value = valid_document();
        value["home"]["id"] = json!("root");

        let err = validate_document(&value).unwrap_err();

        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["home.id"]);
        assert_eq!(err.issues()[0].message, "expected `home`, got `root`");
    }

    #[test]
    fn test_duplicate_owner_rejected() {
        let mut value = valid_document();
        value["owners"] = json!(["alice", "bob", "alice"]);

        let err = validate_document(&value).unwrap_err();

        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["owners[2]"]);
    }

    #[test]
    fn test_image_data_entries_checked() {
        let mut value = valid_document();
        value["imageData"]["img1"]["id"] = json!("other");
        value["imageData"]["img1"]["type"] = json!("Text");

        let err = validate_document(&value).unwrap_err();

        assert_eq!(
            err.paths().collect::<Vec<_>>(),
            vec!["imageData.img1.type", "imageData.img1.id"]
        );
    }

    #[test]
    fn test_invalid_timestamp() {
        let mut value = valid_document();
        value["createdAt"] = json!("yesterday");

        let err = validate_document(&value).unwrap_err();

        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["createdAt"]);
    }

    #[test]
    fn test_element_unknown_type() {
        let err = validate_element(&json!({ "type": "Marquee", "id": "m" })).unwrap_err();
        assert_eq!(err.issues()[0].path, "type");
        assert!(err.to_string().contains("Marquee"));
    }

    #[test]
    fn test_element_missing_required_fields() {
        let err =
            validate_element(&json!({ "type": "PaginationButton", "id": "" })).unwrap_err();
        assert_eq!(
            err.paths().collect::<Vec<_>>(),
            vec!["id", "text", "pageId"]
        );
    }

    #[test]
    fn test_element_optional_attributes_may_be_null_or_absent() {
        let element = validate_element(&json!({
            "type": "Text", "id": "t1", "text": "Hi", "size": null
        }))
        .unwrap();
        assert_eq!(element, Element::text("t1", "Hi"));
    }

    #[test]
    fn test_element_unknown_attributes_dropped() {
        let element = validate_element(&json!({
            "type": "Text", "id": "t1", "text": "Hi", "formKey": "abc"
        }))
        .unwrap();
        assert_eq!(element, Element::text("t1", "Hi"));
    }

    #[test]
    fn test_element_deep_nesting() {
        let mut value = json!({ "type": "Text", "id": "leaf", "text": "deep" });
        for depth in 0..50 {
            value = json!({ "type": "ZStack", "id": format!("z{depth}"), "children": [value] });
        }

        let element = validate_element(&value).unwrap();

        let mut node = &element;
        while let Some(first) = node.children().first() {
            node = first;
        }
        assert_eq!(node.id(), "leaf");
    }

    #[test]
    fn test_element_nested_issue_path() {
        let err = validate_element(&json!({
            "type": "VStack", "id": "v1", "children": [
                { "type": "Text", "id": "t1", "text": "ok" },
                { "type": "Image", "id": "i1", "imageWidth": -4 }
            ]
        }))
        .unwrap_err();
        assert_eq!(
            err.paths().collect::<Vec<_>>(),
            vec!["children[1].url", "children[1].imageWidth"]
        );
    }

    #[test]
    fn test_element_negative_order_rejected() {
        let err = validate_element(&json!({ "type": "Text", "id": "t", "text": "x", "order": -1 }))
            .unwrap_err();
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["order"]);
    }

    #[test]
    fn test_merge_fields_shallow() {
        let doc = validate_document(&valid_document()).unwrap();
        let partial = json!({ "title": "Renamed", "owners": ["alice", "bob"] });

        let merged = merge_fields(&doc, partial.as_object().unwrap()).unwrap();

        assert_eq!(merged.title, "Renamed");
        assert_eq!(merged.owners, vec!["alice".to_owned(), "bob".to_owned()]);
        assert_eq!(merged.home, doc.home);
    }

    #[test]
    fn test_merge_fields_revalidates_result() {
        let doc = validate_document(&valid_document()).unwrap();
        let partial = json!({ "owners": [], "theme": "dark" });

        let err = merge_fields(&doc, partial.as_object().unwrap()).unwrap_err();

        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["theme", "owners"]);
    }

    #[test]
    fn test_merge_fields_replaces_nested_value_wholesale() {
        let doc = validate_document(&valid_document()).unwrap();
        let partial = json!({
            "home": { "id": "home", "light": "#111111", "children": [] }
        });

        let merged = merge_fields(&doc, partial.as_object().unwrap()).unwrap();

        assert!(merged.home.children.is_empty());
        assert_eq!(merged.home.dark, None);
    }

    #[test]
    fn test_validation_error_display() {
        let err = validate_element(&json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: <root>: expected an object, got an array"
        );
    }

    #[test]
    fn test_validation_error_display_joins_issues() {
        let err = validate_element(&json!({ "type": "Text" })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: id: missing required field; text: missing required field"
        );
    }

    #[test]
    fn test_stack_without_children_array() {
        let element = validate_element(&json!({ "type": "VStack", "id": "v" })).unwrap();
        assert_eq!(
            element,
            Element::VStack(StackElement {
                id: "v".to_owned(),
                ..StackElement::default()
            })
        );
    }
}
