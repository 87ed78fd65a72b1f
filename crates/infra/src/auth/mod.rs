//! Caller authentication
//!
//! The data service and the identity endpoint both need the caller's session
//! token. Hosts hand it over through an [`AccessTokenProvider`].

pub mod identity;

use async_trait::async_trait;
use linkbio_domain::Result;
use parking_lot::RwLock;

pub use identity::SupabaseIdentityProvider;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Current session token, `None` when nobody is signed in.
    async fn access_token(&self) -> Result<Option<String>>;
}

/// Session token held in memory and replaced on sign-in / sign-out.
#[derive(Debug, Default)]
pub struct SessionTokenStore {
    token: RwLock<Option<String>>,
}

impl SessionTokenStore {
    /// Empty store: nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: RwLock::new(Some(token.into())) }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

#[async_trait]
impl AccessTokenProvider for SessionTokenStore {
    async fn access_token(&self) -> Result<Option<String>> {
        Ok(self.token.read().clone().filter(|token| !token.is_empty()))
    }
}
