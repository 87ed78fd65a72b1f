//! Logical entities resolved to physical table names at runtime

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// A conceptual table, independent of its current physical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalEntity {
    Profile,
    Theme,
    Links,
}

impl LogicalEntity {
    pub const ALL: [Self; 3] = [Self::Profile, Self::Theme, Self::Links];
}

impl_domain_status_conversions!(LogicalEntity {
    Profile => "profile",
    Theme => "theme",
    Links => "links",
});
