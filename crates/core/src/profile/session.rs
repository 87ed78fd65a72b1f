//! Owner session: local profile state plus write-through mutations
//!
//! The session asks the identity collaborator for a fresh identity before
//! every operation and passes it explicitly to the loader and mutator. Local
//! state changes only after the remote call succeeded, so a failed write
//! never leaves a half-applied local copy.

use std::sync::Arc;

use linkbio_domain::validation::{
    validate_links, validate_profile_update, validate_theme_update,
};
use linkbio_domain::{
    Identity, Link, Profile, ProfileSnapshot, ProfileUpdate, Result, TableConfig, ThemeSettings,
    ThemeUpdate,
};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{error, warn};

use super::loader::{ProfileLoad, ProfileLoader};
use super::mutator::ProfileMutator;
use super::ports::{DataService, IdentityProvider};
use super::resolver::TableResolver;

/// Local owner state backed by the remote data service.
pub struct ProfileSession {
    identity: Arc<dyn IdentityProvider>,
    loader: ProfileLoader,
    mutator: ProfileMutator,
    state: RwLock<ProfileSnapshot>,
    load_lock: Mutex<()>,
}

impl ProfileSession {
    /// Create a session sharing `resolver` with other components.
    pub fn new(
        data: Arc<dyn DataService>,
        identity: Arc<dyn IdentityProvider>,
        resolver: Arc<TableResolver>,
    ) -> Self {
        Self {
            identity,
            loader: ProfileLoader::new(Arc::clone(&data), Arc::clone(&resolver)),
            mutator: ProfileMutator::new(data, resolver),
            state: RwLock::new(ProfileSnapshot::default()),
            load_lock: Mutex::new(()),
        }
    }

    /// Create a session with its own resolver over `tables`.
    pub fn with_tables(
        data: Arc<dyn DataService>,
        identity: Arc<dyn IdentityProvider>,
        tables: TableConfig,
    ) -> Self {
        Self::new(data, identity, Arc::new(TableResolver::new(tables)))
    }

    /// Current identity, or `None` if it cannot be confirmed.
    async fn confirm_identity(&self) -> Option<Identity> {
        match self.identity.current_identity().await {
            Ok(identity) => identity,
            Err(err) => {
                warn!(error = %err, "identity check failed, treating caller as unauthenticated");
                None
            }
        }
    }

    /// Id of the loaded profile if it belongs to `identity`.
    fn owned_profile_id(&self, identity: Option<&Identity>) -> Option<String> {
        let identity = identity?;
        let state = self.state.read();
        state
            .profile
            .as_ref()
            .filter(|profile| profile.owner_id == identity.id)
            .map(|profile| profile.id.clone())
    }

    /// (Re)load local state for the current identity.
    ///
    /// Concurrent calls on one session run one after another. On failure the
    /// local state is cleared and the error returned.
    pub async fn load(&self) -> Result<ProfileLoad> {
        let _guard = self.load_lock.lock().await;
        let identity = self.confirm_identity().await;

        match self.loader.load_or_create(identity.as_ref()).await {
            Ok(outcome) => {
                *self.state.write() = outcome.snapshot().cloned().unwrap_or_default();
                Ok(outcome)
            }
            Err(err) => {
                error!(error = %err, "failed to load profile data");
                *self.state.write() = ProfileSnapshot::default();
                Err(err)
            }
        }
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        self.state.read().clone()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.state.read().profile.clone()
    }

    pub fn theme(&self) -> Option<ThemeSettings> {
        self.state.read().theme.clone()
    }

    pub fn links(&self) -> Vec<Link> {
        self.state.read().links.clone()
    }

    /// Forget all local state, e.g. on sign-out.
    pub fn clear(&self) {
        *self.state.write() = ProfileSnapshot::default();
    }

    /// Partial profile update without validation.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<()> {
        let identity = self.confirm_identity().await;
        self.mutator.update_profile(identity.as_ref(), &update).await?;

        if let Some(identity) = identity {
            let mut state = self.state.write();
            if let Some(profile) = state.profile.as_mut().filter(|p| p.owner_id == identity.id) {
                update.apply_to(profile);
            }
        }
        Ok(())
    }

    /// Partial theme update without validation.
    pub async fn update_theme(&self, update: ThemeUpdate) -> Result<()> {
        let identity = self.confirm_identity().await;
        let profile_id = self.owned_profile_id(identity.as_ref());
        self.mutator.update_theme(identity.as_ref(), profile_id.as_deref(), &update).await?;

        if let Some(theme) = self.state.write().theme.as_mut() {
            update.apply_to(theme);
        }
        Ok(())
    }

    /// Replace the whole link collection without validation.
    pub async fn replace_links(&self, links: Vec<Link>) -> Result<()> {
        let identity = self.confirm_identity().await;
        let profile_id = self.owned_profile_id(identity.as_ref());
        let stored =
            self.mutator.replace_links(identity.as_ref(), profile_id.as_deref(), &links).await?;

        self.state.write().links = stored;
        Ok(())
    }

    /// Trim, validate, then [`Self::update_profile`].
    pub async fn save_profile(&self, update: ProfileUpdate) -> Result<()> {
        let update = update.trimmed();
        validate_profile_update(&update)?;
        self.update_profile(update).await
    }

    /// Validate, then [`Self::update_theme`].
    pub async fn save_theme(&self, update: ThemeUpdate) -> Result<()> {
        validate_theme_update(&update)?;
        self.update_theme(update).await
    }

    /// Trim and validate every link, then [`Self::replace_links`].
    pub async fn save_links(&self, links: Vec<Link>) -> Result<()> {
        let links: Vec<Link> = links.into_iter().map(Link::trimmed).collect();
        validate_links(&links)?;
        self.replace_links(links).await
    }
}
