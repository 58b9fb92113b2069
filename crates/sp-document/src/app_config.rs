//! The singleton `config` record.

use serde::{Deserialize, Serialize};
use sp_schema::ThemeColor;

/// Defaults applied to newly created documents.
///
/// Stored as JSON under the `config` key. Missing fields take their
/// defaults, so an absent record reads as [`AppConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub default_title: String,
    pub default_header: String,
    pub default_subheader: String,
    pub default_color: ThemeColor,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_title: "Untitled".to_owned(),
            default_header: String::new(),
            default_subheader: String::new(),
            default_color: ThemeColor::default(),
        }
    }
}
