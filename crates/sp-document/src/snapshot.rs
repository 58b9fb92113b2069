//! Values handed back by the controller.

use sp_schema::{AppInstance, HOME_PAGE_ID, Home, Page, ThemeColor};
use sp_store::Revision;

/// A document as loaded or written, with the store revision it was read at.
///
/// Pass nothing between calls but the post id; a snapshot is only a view.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub document: AppInstance,
    pub revision: Revision,
}

/// A tree selected by page id.
#[derive(Clone, Debug, PartialEq)]
pub enum PageView {
    /// Selected with the reserved id `"home"`.
    Home(Home),
    Page(Page),
}

impl PageView {
    /// Select `page_id` from `document`.
    pub(crate) fn select(document: &AppInstance, page_id: &str) -> Option<Self> {
        if page_id == HOME_PAGE_ID {
            return Some(Self::Home(document.home.clone()));
        }
        document.pages.get(page_id).cloned().map(Self::Page)
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        match self {
            Self::Home(page) | Self::Page(page) => page,
        }
    }

    #[must_use]
    pub fn into_page(self) -> Page {
        match self {
            Self::Home(page) | Self::Page(page) => page,
        }
    }

    #[must_use]
    pub fn is_home(&self) -> bool {
        matches!(self, Self::Home(_))
    }
}

/// Initial fields for [`Controller::create_document`](crate::Controller::create_document).
///
/// Unset fields fall back to the stored [`AppConfig`](crate::AppConfig).
#[derive(Clone, Debug, Default)]
pub struct NewDocument {
    /// Creating user; also the first owner.
    pub created_by: String,
    pub title: Option<String>,
    pub header: Option<String>,
    pub subheader: Option<String>,
    pub color: Option<ThemeColor>,
}

impl NewDocument {
    #[must_use]
    pub fn new(created_by: impl Into<String>) -> Self {
        Self {
            created_by: created_by.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Result of [`Controller::add_element`](crate::Controller::add_element).
#[derive(Clone, Debug, PartialEq)]
pub struct Added {
    /// Id of the added element, generated when the input had none.
    pub element_id: String,
    /// False when no container matched and nothing was written.
    pub added: bool,
    pub snapshot: Snapshot,
}
