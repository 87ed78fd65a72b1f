//! Anonymous, read-only profile view keyed by username

use std::sync::Arc;

use linkbio_domain::constants::{
    DISPLAY_ORDER_COLUMN, IS_ACTIVE_COLUMN, PROFILE_ID_COLUMN, PUBLIC_PROFILE_COLUMNS,
    USERNAME_COLUMN,
};
use linkbio_domain::{
    Link, LinkBioError, LogicalEntity, PublicProfile, PublicProfileView, Result, ThemeSettings,
};
use tracing::{debug, instrument};

use super::ports::{DataService, SelectQuery};
use super::resolver::TableResolver;
use super::rows::{decode, decode_all};

/// Reads any user's public profile. Never writes.
pub struct PublicProfileReader {
    data: Arc<dyn DataService>,
    resolver: Arc<TableResolver>,
}

impl PublicProfileReader {
    pub fn new(data: Arc<dyn DataService>, resolver: Arc<TableResolver>) -> Self {
        Self { data, resolver }
    }

    /// Public view for `username`.
    ///
    /// Only the public column subset is fetched and only active links are
    /// returned. A missing profile is [`LinkBioError::NotFound`], never
    /// created.
    #[instrument(skip(self))]
    pub async fn read_public(&self, username: &str) -> Result<PublicProfileView> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LinkBioError::NotFound("profile not found".into()));
        }

        let row = self
            .resolver
            .resolve(LogicalEntity::Profile, |table| {
                let query = SelectQuery::from(table)
                    .columns(PUBLIC_PROFILE_COLUMNS)
                    .eq(USERNAME_COLUMN, username);
                let data = Arc::clone(&self.data);
                async move { data.select_maybe_single(&query).await }
            })
            .await?
            .ok_or_else(|| LinkBioError::NotFound(format!("profile not found: {username}")))?;
        let profile: PublicProfile = decode(row, "public profile")?;

        let theme = self.theme(&profile.id).await?;
        let links = self.active_links(&profile.id).await?;

        debug!(profile_id = %profile.id, links = links.len(), "public profile read");
        Ok(PublicProfileView { profile, theme, links })
    }

    async fn theme(&self, profile_id: &str) -> Result<Option<ThemeSettings>> {
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

    async fn active_links(&self, profile_id: &str) -> Result<Vec<Link>> {
        let rows = self
            .resolver
            .resolve(LogicalEntity::Links, |table| {
                let query = SelectQuery::from(table)
                    .eq(PROFILE_ID_COLUMN, profile_id)
                    .eq(IS_ACTIVE_COLUMN, true)
                    .order_by(DISPLAY_ORDER_COLUMN, true);
                let data = Arc::clone(&self.data);
                async move { data.select(&query).await }
            })
            .await?;

        let links: Vec<Link> = decode_all(rows, "link")?;
        // Enforced locally as well as by the remote filter.
        Ok(links.into_iter().filter(|link| link.is_active).collect())
    }
}
