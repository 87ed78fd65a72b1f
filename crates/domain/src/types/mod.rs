//! Domain types and models
//!
//! Three related records make up a profile page: the [`Profile`] itself, its
//! one-to-one [`ThemeSettings`] and an ordered collection of [`Link`]s.

pub mod entity;
pub mod identity;
pub mod link;
pub mod profile;
pub mod theme;

pub use entity::LogicalEntity;
pub use identity::Identity;
pub use link::{renumber, Link, NewLinkRow};
pub use profile::{NewProfileRow, Profile, ProfileUpdate, PublicProfile};
pub use theme::{BgType, ButtonStyle, ThemeSettings, ThemeUpdate};

use serde::{Deserialize, Serialize};

/// Everything the owner view needs, as loaded for one identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub profile: Option<Profile>,
    /// `None` until the backend provisions a theme row.
    pub theme: Option<ThemeSettings>,
    /// All links, active or not, ordered by `display_order`.
    pub links: Vec<Link>,
}

impl ProfileSnapshot {
    pub fn is_empty(&self) -> bool {
        self.profile.is_none() && self.theme.is_none() && self.links.is_empty()
    }
}

/// Read-only view rendered for anonymous visitors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicProfileView {
    pub profile: PublicProfile,
    pub theme: Option<ThemeSettings>,
    /// Active links only, ordered by `display_order`.
    pub links: Vec<Link>,
}
