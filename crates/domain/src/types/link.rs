//! Outbound links, many per profile, densely ordered

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

/// Link row
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Link {
    /// Service-assigned id. Links drafted locally may carry a placeholder.
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub icon_class: String,
    /// Visible to public viewers iff true.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Zero-based rank within the profile.
    #[serde(default)]
    pub display_order: i32,
}

fn default_active() -> bool {
    true
}

impl Link {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            url: url.into(),
            icon_class: String::new(),
            is_active: true,
            display_order: 0,
        }
    }

    pub fn with_icon(mut self, icon_class: impl Into<String>) -> Self {
        self.icon_class = icon_class.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Same link with surrounding whitespace removed from its text fields.
    #[must_use]
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            url: self.url.trim().to_string(),
            icon_class: self.icon_class.trim().to_string(),
            ..self
        }
    }
}

/// Row written by a replace-all. `display_order` comes from list position,
/// never from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLinkRow {
    pub profile_id: String,
    pub title: String,
    pub url: String,
    pub icon_class: String,
    pub is_active: bool,
    pub display_order: i32,
}

impl NewLinkRow {
    /// Rows for `links` in order, ranked `0..len`.
    pub fn from_ordered(profile_id: &str, links: &[Link]) -> Vec<Self> {
        links
            .iter()
            .zip(0..)
            .map(|(link, position)| Self {
                profile_id: profile_id.to_string(),
                title: link.title.clone(),
                url: link.url.clone(),
                icon_class: link.icon_class.clone(),
                is_active: link.is_active,
                display_order: position,
            })
            .collect()
    }
}

/// Copy of `links` with `display_order` rewritten to list position.
pub fn renumber(links: &[Link]) -> Vec<Link> {
    links
        .iter()
        .zip(0..)
        .map(|(link, position)| Link { display_order: position, ..link.clone() })
        .collect()
}
