//! Element model.
//!
//! An [`Element`] is a closed sum over every widget a post can show. The JSON
//! form is internally tagged by `type`:
//!
//! ```json
//! { "type": "VStack", "id": "v1", "children": [
//!     { "type": "Text", "id": "t1", "text": "Hello" }
//! ] }
//! ```
//!
//! Styling attributes (size, color, alignment, dimensions) are opaque strings
//! here; only the renderer interprets them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A node in a page tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    Image(ImageElement),
    Text(TextElement),
    Button(ButtonElement),
    PaginationButton(PaginationButtonElement),
    PersonalPlug(PersonalPlugElement),
    VStack(StackElement),
    HStack(StackElement),
    ZStack(StackElement),
}

/// Discriminator of an [`Element`], matching the JSON `type` tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Image,
    Text,
    Button,
    PaginationButton,
    PersonalPlug,
    VStack,
    HStack,
    ZStack,
}

impl ElementKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Image,
        Self::Text,
        Self::Button,
        Self::PaginationButton,
        Self::PersonalPlug,
        Self::VStack,
        Self::HStack,
        Self::ZStack,
    ];

    /// The JSON `type` tag for this kind.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Text => "Text",
            Self::Button => "Button",
            Self::PaginationButton => "PaginationButton",
            Self::PersonalPlug => "PersonalPlug",
            Self::VStack => "VStack",
            Self::HStack => "HStack",
            Self::ZStack => "ZStack",
        }
    }

    /// Look up a kind by its JSON tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Whether elements of this kind own a child forest.
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, Self::VStack | Self::HStack | Self::ZStack)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Image leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// Alt text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Text leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
}

/// Button leaf. Navigates to `url` or, inside the post, to `page_id`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonElement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

/// Link to another page of the same post.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationButtonElement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    pub text: String,
    pub page_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Creator promotion card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalPlugElement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body shared by the three stack containers.
///
/// `children` distinguishes "no array" from "empty array" so that both
/// survive a serialization round trip.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackElement {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Element>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<String>,
}

impl StackElement {
    /// Create an empty stack with an explicit (empty) children array.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Builder-style child append, mainly for tests and fixtures.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }
}

impl Element {
    /// Element id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Image(e) => &e.id,
            Self::Text(e) => &e.id,
            Self::Button(e) => &e.id,
            Self::PaginationButton(e) => &e.id,
            Self::PersonalPlug(e) => &e.id,
            Self::VStack(e) | Self::HStack(e) | Self::ZStack(e) => &e.id,
        }
    }

    /// Display order hint.
    #[must_use]
    pub fn order(&self) -> Option<u32> {
        match self {
            Self::Image(e) => e.order,
            Self::Text(e) => e.order,
            Self::Button(e) => e.order,
            Self::PaginationButton(e) => e.order,
            Self::PersonalPlug(e) => e.order,
            Self::VStack(e) | Self::HStack(e) | Self::ZStack(e) => e.order,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Image(_) => ElementKind::Image,
            Self::Text(_) => ElementKind::Text,
            Self::Button(_) => ElementKind::Button,
            Self::PaginationButton(_) => ElementKind::PaginationButton,
            Self::PersonalPlug(_) => ElementKind::PersonalPlug,
            Self::VStack(_) => ElementKind::VStack,
            Self::HStack(_) => ElementKind::HStack,
            Self::ZStack(_) => ElementKind::ZStack,
        }
    }

    /// Container body, if this is a stack.
    #[must_use]
    pub fn stack(&self) -> Option<&StackElement> {
        match self {
            Self::VStack(s) | Self::HStack(s) | Self::ZStack(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable container body, if this is a stack.
    pub fn stack_mut(&mut self) -> Option<&mut StackElement> {
        match self {
            Self::VStack(s) | Self::HStack(s) | Self::ZStack(s) => Some(s),
            _ => None,
        }
    }

    /// Children of a container; empty for leaves and for stacks without an array.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        self.stack()
            .and_then(|s| s.children.as_deref())
            .unwrap_or_default()
    }

    /// Shorthand for a text element with only the required fields.
    #[must_use]
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text(TextElement {
            id: id.into(),
            text: text.into(),
            ..TextElement::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ElementKind::from_tag("Marquee"), None);
    }

    #[test]
    fn test_deserialize_nested_stack() {
        let value = json!({
            "type": "HStack",
            "id": "h1",
            "gap": "small",
            "children": [
                { "type": "Text", "id": "t1", "text": "Hi", "order": 2 },
                { "type": "ZStack", "id": "z1" }
            ]
        });

        let element: Element = serde_json::from_value(value).unwrap();

        assert_eq!(element.kind(), ElementKind::HStack);
        assert_eq!(element.children().len(), 2);
        assert_eq!(element.children()[0].order(), Some(2));
        assert_eq!(element.children()[1].stack().unwrap().children, None);
    }

    #[test]
    fn test_serialize_omits_absent_attributes() {
        let element = Element::text("t1", "Hello");

        let value = serde_json::to_value(&element).unwrap();

        assert_eq!(value, json!({ "type": "Text", "id": "t1", "text": "Hello" }));
    }

    #[test]
    fn test_empty_children_survive_round_trip() {
        let element = Element::VStack(StackElement::new("v1"));

        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["children"], json!([]));

        let back: Element = serde_json::from_value(value).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_leaf_has_no_children() {
        let element = Element::text("t1", "x");
        assert!(element.stack().is_none());
        assert!(element.children().is_empty());
        assert!(!element.kind().is_container());
    }
}
