//! Owner-side profile loading
//!
//! Resolves the caller's profile row, creating it on first access, then loads
//! the linked theme row and the full ordered link collection.

use std::sync::Arc;

use chrono::Utc;
use linkbio_domain::constants::{DISPLAY_ORDER_COLUMN, OWNER_COLUMN, PROFILE_ID_COLUMN};
use linkbio_domain::{
    Identity, Link, LinkBioError, LogicalEntity, NewProfileRow, Profile, ProfileSnapshot, Result,
    ThemeSettings,
};
use tracing::{debug, info, instrument, warn};

use super::ports::{DataService, SelectQuery};
use super::resolver::TableResolver;
use super::rows::{decode, decode_all, encode};

/// Outcome of [`ProfileLoader::load_or_create`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileLoad {
    /// No identity was supplied; nothing was read.
    Unauthenticated,
    /// The caller already had a profile row.
    Existing(ProfileSnapshot),
    /// A profile row was created by this load.
    Created(ProfileSnapshot),
}

impl ProfileLoad {
    pub fn snapshot(&self) -> Option<&ProfileSnapshot> {
        match self {
            Self::Unauthenticated => None,
            Self::Existing(snapshot) | Self::Created(snapshot) => Some(snapshot),
        }
    }

    pub fn into_snapshot(self) -> ProfileSnapshot {
        match self {
            Self::Unauthenticated => ProfileSnapshot::default(),
            Self::Existing(snapshot) | Self::Created(snapshot) => snapshot,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Loads profile, theme and links for an authenticated caller.
pub struct ProfileLoader {
    data: Arc<dyn DataService>,
    resolver: Arc<TableResolver>,
}

impl ProfileLoader {
    pub fn new(data: Arc<dyn DataService>, resolver: Arc<TableResolver>) -> Self {
        Self { data, resolver }
    }

    /// Load the caller's profile, creating it when absent.
    ///
    /// Reading has one side effect: at most one profile row is inserted for
    /// an identity that has none. Theme and link rows are never created.
    #[instrument(skip(self, identity), fields(authenticated = identity.is_some()))]
    pub async fn load_or_create(&self, identity: Option<&Identity>) -> Result<ProfileLoad> {
        let Some(identity) = identity else {
            debug!("no identity, skipping profile load");
            return Ok(ProfileLoad::Unauthenticated);
        };

        let (profile, created) = match self.find_profile(identity).await? {
            Some(profile) => (profile, false),
            None => self.create_profile(identity).await?,
        };

        let theme = self.load_theme(&profile.id).await?;
        let links = self.load_links(&profile.id).await?;

        debug!(
            profile_id = %profile.id,
            has_theme = theme.is_some(),
            links = links.len(),
            "profile loaded"
        );

        let snapshot = ProfileSnapshot { profile: Some(profile), theme, links };
        Ok(if created { ProfileLoad::Created(snapshot) } else { ProfileLoad::Existing(snapshot) })
    }

    /// Profile owned by `identity`; `None` when the caller has no row yet.
    pub async fn find_profile(&self, identity: &Identity) -> Result<Option<Profile>> {
        let row = self
            .resolver
            .resolve(LogicalEntity::Profile, |table| {
                let query = SelectQuery::from(table).eq(OWNER_COLUMN, identity.id.as_str());
                let data = Arc::clone(&self.data);
                async move { data.select_maybe_single(&query).await }
            })
            .await?;

        row.map(|row| decode(row, "profile")).transpose()
    }

    /// Insert a profile for `identity` with its default username.
    ///
    /// If another writer created the row first the backend's uniqueness
    /// constraint on the owner column reports a conflict, and the existing row
    /// is adopted instead. Returns the profile and whether this call created
    /// it.
    async fn create_profile(&self, identity: &Identity) -> Result<(Profile, bool)> {
        let row = encode(&NewProfileRow::for_identity(identity, Utc::now()))?;

        let inserted = self
            .resolver
            .resolve(LogicalEntity::Profile, |table| {
                let data = Arc::clone(&self.data);
                let row = row.clone();
                async move { data.insert(&table, vec![row]).await }
            })
            .await;

        match inserted {
            Ok(rows) => {
                let row = rows.into_iter().next().ok_or_else(|| {
                    LinkBioError::RemoteFailure("profile insert returned no row".into())
                })?;
                let profile: Profile = decode(row, "profile")?;
                info!(profile_id = %profile.id, username = %profile.username, "created profile");
                Ok((profile, true))
            }
            Err(LinkBioError::Conflict(detail)) => {
                warn!(%detail, "profile created concurrently, adopting existing row");
                let profile = self.find_profile(identity).await?.ok_or_else(|| {
                    LinkBioError::Conflict(format!(
                        "profile insert conflicted but no profile exists for owner: {detail}"
                    ))
                })?;
                Ok((profile, false))
            }
            Err(err) => Err(err),
        }
    }

    /// Theme row for `profile_id`; zero rows means no theme yet.
    pub async fn load_theme(&self, profile_id: &str) -> Result<Option<ThemeSettings>> {
        let row = self
            .resolver
            .resolve(LogicalEntity::Theme, |table| {
                let query = SelectQuery::from(table).eq(PROFILE_ID_COLUMN, profile_id);
                let data = Arc::clone(&self.data);
                async move { data.select_maybe_single(&query).await }
            })
            .await?;

        row.map(|row| decode(row, "theme")).transpose()
    }

    /// Every link for `profile_id`, active or not, by `display_order`.
    pub async fn load_links(&self, profile_id: &str) -> Result<Vec<Link>> {
        let rows = self
            .resolver
            .resolve(LogicalEntity::Links, |table| {
                let query = SelectQuery::from(table)
                    .eq(PROFILE_ID_COLUMN, profile_id)
                    .order_by(DISPLAY_ORDER_COLUMN, true);
                let data = Arc::clone(&self.data);
                async move { data.select(&query).await }
            })
            .await?;

        decode_all(rows, "link")
    }
}
