//! Owner-side write operations
//!
//! Each operation takes the caller's identity explicitly, writes through to
//! the data service and reports success only once the remote write has
//! landed. Mirroring into local state is the caller's job.

use std::sync::Arc;

use linkbio_domain::constants::{OWNER_COLUMN, PROFILE_ID_COLUMN};
use linkbio_domain::{
    renumber, Identity, Link, LinkBioError, LogicalEntity, NewLinkRow, ProfileUpdate, Result,
    ThemeUpdate,
};
use tracing::{debug, info, instrument, warn};

use super::ports::{DataService, Filter};
use super::resolver::TableResolver;
use super::rows::encode;

/// Applies profile, theme and link mutations remotely.
pub struct ProfileMutator {
    data: Arc<dyn DataService>,
    resolver: Arc<TableResolver>,
}

fn require_identity(identity: Option<&Identity>) -> Result<&Identity> {
    identity.ok_or(LinkBioError::Unauthenticated)
}

fn require_profile_id(profile_id: Option<&str>) -> Result<&str> {
    profile_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| LinkBioError::NotFound("no profile loaded".into()))
}

impl ProfileMutator {
    pub fn new(data: Arc<dyn DataService>, resolver: Arc<TableResolver>) -> Self {
        Self { data, resolver }
    }

    /// Partial update of the caller's own profile row.
    ///
    /// The row is addressed by owner, not by profile id, so a caller can only
    /// ever touch the profile they own.
    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        identity: Option<&Identity>,
        update: &ProfileUpdate,
    ) -> Result<()> {
        let identity = require_identity(identity)?;
        if update.is_empty() {
            debug!("empty profile update, nothing to send");
            return Ok(());
        }

        let patch = encode(update)?;
        let filter = Filter::eq(OWNER_COLUMN, identity.id.as_str());
        self.resolver
            .resolve(LogicalEntity::Profile, |table| {
                let data = Arc::clone(&self.data);
                let patch = patch.clone();
                let filter = filter.clone();
                async move { data.update(&table, patch, &filter).await }
            })
            .await?;

        info!(fields = ?patch.keys().collect::<Vec<_>>(), "profile updated");
        Ok(())
    }

    /// Partial update of the theme row linked to `profile_id`.
    #[instrument(skip_all)]
    pub async fn update_theme(
        &self,
        identity: Option<&Identity>,
        profile_id: Option<&str>,
        update: &ThemeUpdate,
    ) -> Result<()> {
        require_identity(identity)?;
        let profile_id = require_profile_id(profile_id)?;
        if update.is_empty() {
            debug!("empty theme update, nothing to send");
            return Ok(());
        }

        let patch = encode(update)?;
        let filter = Filter::eq(PROFILE_ID_COLUMN, profile_id);
        self.resolver
            .resolve(LogicalEntity::Theme, |table| {
                let data = Arc::clone(&self.data);
                let patch = patch.clone();
                let filter = filter.clone();
                async move { data.update(&table, patch, &filter).await }
            })
            .await?;

        info!(%profile_id, fields = ?patch.keys().collect::<Vec<_>>(), "theme updated");
        Ok(())
    }

    /// Replace the whole link collection of `profile_id` with `links`.
    ///
    /// `display_order` is re-derived from list position; whatever the caller
    /// put there is ignored. Returns the list as it now stands, renumbered.
    #[instrument(skip_all, fields(count = links.len()))]
    pub async fn replace_links(
        &self,
        identity: Option<&Identity>,
        profile_id: Option<&str>,
        links: &[Link],
    ) -> Result<Vec<Link>> {
        require_identity(identity)?;
        let profile_id = require_profile_id(profile_id)?;

        let rows = NewLinkRow::from_ordered(profile_id, links)
            .iter()
            .map(encode)
            .collect::<Result<Vec<_>>>()?;
        let scope = Filter::eq(PROFILE_ID_COLUMN, profile_id);

        let stored = self
            .resolver
            .resolve(LogicalEntity::Links, |table| {
                let data = Arc::clone(&self.data);
                let rows = rows.clone();
                let scope = scope.clone();
                async move { data.replace_rows(&table, &scope, rows).await }
            })
            .await
            .inspect_err(|err| {
                if matches!(err, LinkBioError::PartialWriteInconsistency(_)) {
                    warn!(
                        %profile_id,
                        error = %err,
                        "link replacement left remote state inconsistent"
                    );
                }
            })?;

        if stored.len() != links.len() {
            warn!(
                %profile_id,
                submitted = links.len(),
                stored = stored.len(),
                "data service stored a different number of links than submitted"
            );
        }

        info!(%profile_id, count = links.len(), "links replaced");
        Ok(renumber(links))
    }
}
