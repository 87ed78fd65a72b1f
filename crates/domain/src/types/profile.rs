//! Profile records
//!
//! A profile is owned by exactly one identity and is looked up publicly by its
//! unique `username`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use super::Identity;

/// Full profile row as seen by its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Profile {
    pub id: String,
    /// Authenticated identity that owns this row. Immutable after creation.
    #[serde(rename = "user_id", alias = "owner_id")]
    pub owner_id: String,
    pub username: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts-gen", ts(type = "string | null"))]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "ts-gen", ts(type = "string | null"))]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Public-safe projection of this profile.
    pub fn to_public(&self) -> PublicProfile {
        PublicProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            title: self.title.clone(),
            role: self.role.clone(),
            company: self.company.clone(),
            bio: self.bio.clone(),
            profile_picture_url: self.profile_picture_url.clone(),
            cover_image_url: self.cover_image_url.clone(),
        }
    }
}

/// Row inserted when a profile is created on first authenticated access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfileRow {
    #[serde(rename = "user_id")]
    pub owner_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewProfileRow {
    pub fn for_identity(identity: &Identity, now: DateTime<Utc>) -> Self {
        Self {
            owner_id: identity.id.clone(),
            username: identity.default_username(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Profile fields visible to anonymous visitors. Contact fields are never
/// fetched on the public path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct PublicProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

/// Partial profile update.
///
/// `None` leaves a field untouched. For nullable fields `Some(None)` clears the
/// column and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub title: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub role: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub company: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub bio: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub profile_picture_url: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub cover_image_url: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub contact_email: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub contact_phone: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub contact_location: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Same update with surrounding whitespace removed from every text field.
    #[must_use]
    pub fn trimmed(self) -> Self {
        fn trim(value: Option<Option<String>>) -> Option<Option<String>> {
            value.map(|inner| inner.map(|text| text.trim().to_string()))
        }

        Self {
            username: self.username.map(|username| username.trim().to_string()),
            title: trim(self.title),
            role: trim(self.role),
            company: trim(self.company),
            bio: trim(self.bio),
            profile_picture_url: trim(self.profile_picture_url),
            cover_image_url: trim(self.cover_image_url),
            contact_email: trim(self.contact_email),
            contact_phone: trim(self.contact_phone),
            contact_location: trim(self.contact_location),
        }
    }

    /// Merge the set fields into `profile`, leaving the rest unchanged.
    pub fn apply_to(&self, profile: &mut Profile) {
        fn merge(target: &mut Option<String>, value: &Option<Option<String>>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }

        if let Some(username) = &self.username {
            profile.username.clone_from(username);
        }
        merge(&mut profile.title, &self.title);
        merge(&mut profile.role, &self.role);
        merge(&mut profile.company, &self.company);
        merge(&mut profile.bio, &self.bio);
        merge(&mut profile.profile_picture_url, &self.profile_picture_url);
        merge(&mut profile.cover_image_url, &self.cover_image_url);
        merge(&mut profile.contact_email, &self.contact_email);
        merge(&mut profile.contact_phone, &self.contact_phone);
        merge(&mut profile.contact_location, &self.contact_location);
    }
}
