//! Document model: pages, theme colors and the per-post [`AppInstance`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::element::{Element, ImageElement};

/// Reserved page id that selects [`AppInstance::home`] instead of the `pages` map.
pub const HOME_PAGE_ID: &str = "home";

/// Publication state of a document. Only moves forward, `Draft` to `Live`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Live,
}

impl Status {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Live => "live",
        }
    }
}

/// Light and dark theme colors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColor {
    pub light: String,
    #[serde(default)]
    pub dark: Option<String>,
}

impl Default for ThemeColor {
    fn default() -> Self {
        Self {
            light: "#FFFFFF".to_owned(),
            dark: Some("#1A1A1B".to_owned()),
        }
    }
}

/// A page: a themed root holding an ordered forest of elements.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub light: String,
    #[serde(default)]
    pub dark: Option<String>,
    pub children: Vec<Element>,
}

/// The home page has the same shape as every other page.
pub type Home = Page;

impl Page {
    /// Create an empty page using the given theme.
    #[must_use]
    pub fn empty(id: impl Into<String>, color: &ThemeColor) -> Self {
        Self {
            id: id.into(),
            light: color.light.clone(),
            dark: color.dark.clone(),
            children: Vec::new(),
        }
    }
}

/// The single persisted record for one post.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppInstance {
    pub status: Status,
    #[serde(default)]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    /// Usernames allowed to edit. Never empty.
    pub owners: Vec<String>,
    pub color: ThemeColor,
    pub title: String,
    pub header: String,
    pub subheader: String,
    pub image_data: BTreeMap<String, ImageElement>,
    pub home: Home,
    pub pages: BTreeMap<String, Page>,
}

impl AppInstance {
    /// Select a tree by page id. `"home"` selects the home page.
    #[must_use]
    pub fn tree(&self, page_id: &str) -> Option<&Page> {
        if page_id == HOME_PAGE_ID {
            Some(&self.home)
        } else {
            self.pages.get(page_id)
        }
    }

    /// Mutable variant of [`tree`](Self::tree).
    pub fn tree_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        if page_id == HOME_PAGE_ID {
            Some(&mut self.home)
        } else {
            self.pages.get_mut(page_id)
        }
    }

    /// Home followed by every page, in key order.
    pub fn trees(&self) -> impl Iterator<Item = &Page> {
        std::iter::once(&self.home).chain(self.pages.values())
    }

    /// Mutable variant of [`trees`](Self::trees).
    pub fn trees_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        std::iter::once(&mut self.home).chain(self.pages.values_mut())
    }

    #[must_use]
    pub fn is_owner(&self, username: &str) -> bool {
        self.owners.iter().any(|owner| owner == username)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn sample() -> AppInstance {
        let color = ThemeColor::default();
        AppInstance {
            status: Status::Draft,
            url: None,
            created_at: DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            created_by: "alice".to_owned(),
            owners: vec!["alice".to_owned()],
            color: color.clone(),
            title: "Title".to_owned(),
            header: "Header".to_owned(),
            subheader: "Sub".to_owned(),
            image_data: BTreeMap::new(),
            home: Page::empty("home", &color),
            pages: BTreeMap::from([("p1".to_owned(), Page::empty("p1", &color))]),
        }
    }

    #[test]
    fn test_tree_selects_home_for_sentinel() {
        let doc = sample();
        assert_eq!(doc.tree("home").unwrap().id, "home");
        assert_eq!(doc.tree("p1").unwrap().id, "p1");
        assert!(doc.tree("missing").is_none());
    }

    #[test]
    fn test_trees_visits_home_first() {
        let doc = sample();
        let ids: Vec<&str> = doc.trees().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["home", "p1"]);
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["status"], json!("draft"));
        assert_eq!(value["url"], json!(null));
        assert_eq!(value["createdBy"], json!("alice"));
        assert_eq!(value["imageData"], json!({}));
        assert_eq!(value["home"]["children"], json!([]));
    }

    #[test]
    fn test_is_owner() {
        let doc = sample();
        assert!(doc.is_owner("alice"));
        assert!(!doc.is_owner("bob"));
    }
}
