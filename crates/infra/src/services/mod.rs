//! Service wiring
//!
//! Builds the core services on top of the PostgREST and identity adapters
//! so hosts only deal with configuration and a session token source.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use linkbio_infra::auth::SessionTokenStore;
//! use linkbio_infra::services::LinkBioServices;
//!
//! # async fn example() -> linkbio_domain::Result<()> {
//! let config = linkbio_infra::config::load()?;
//! let tokens = Arc::new(SessionTokenStore::with_token("user-session-jwt"));
//! let services = LinkBioServices::connect(&config, tokens)?;
//!
//! services.session.load().await?;
//! let view = services.public.read_public("ana").await?;
//! # let _ = view;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use linkbio_core::profile::{DataService, ProfileSession, PublicProfileReader, TableResolver};
use linkbio_domain::{Config, Result};
use tracing::info;

use crate::auth::{AccessTokenProvider, SupabaseIdentityProvider};
use crate::postgrest::PostgrestDataService;

/// Owner session and public reader sharing one data service and one table
/// resolver.
pub struct LinkBioServices {
    pub session: ProfileSession,
    pub public: PublicProfileReader,
    pub resolver: Arc<TableResolver>,
}

impl LinkBioServices {
    /// # Errors
    /// `LinkBioError::Config` if `config` is invalid.
    pub fn connect(config: &Config, tokens: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        config.validate()?;

        let data: Arc<dyn DataService> = Arc::new(
            PostgrestDataService::new(&config.data_service)?
                .with_token_provider(Arc::clone(&tokens)),
        );
        let identity = Arc::new(SupabaseIdentityProvider::new(&config.data_service, tokens)?);
        let resolver = Arc::new(TableResolver::new(config.tables.clone()));

        info!(url = %config.data_service.url, "data services connected");

        Ok(Self {
            session: ProfileSession::new(Arc::clone(&data), identity, Arc::clone(&resolver)),
            public: PublicProfileReader::new(data, Arc::clone(&resolver)),
            resolver,
        })
    }
}
