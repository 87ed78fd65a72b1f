//! Identity lookup against the hosted auth service

use std::sync::Arc;

use async_trait::async_trait;
use linkbio_core::profile::IdentityProvider;
use linkbio_domain::{DataServiceConfig, Identity, LinkBioError, Result};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::AccessTokenProvider;
use crate::errors::InfraError;
use crate::http::HttpClient;

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Resolves the caller's identity with `GET /auth/v1/user`.
pub struct SupabaseIdentityProvider {
    http: HttpClient,
    user_url: Url,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl SupabaseIdentityProvider {
    /// # Errors
    /// `LinkBioError::Config` if the service URL is invalid.
    pub fn new(config: &DataServiceConfig, tokens: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let base = format!("{}/", config.url.trim_end_matches('/'));
        let user_url = Url::parse(&base)
            .and_then(|base| base.join("auth/v1/user"))
            .map_err(InfraError::from)?;
        let http = HttpClient::for_service(config)?;

        Ok(Self { http, user_url, tokens })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    #[instrument(skip(self))]
    async fn current_identity(&self) -> Result<Option<Identity>> {
        let Some(token) = self.tokens.access_token().await? else {
            debug!("no session token, caller is anonymous");
            return Ok(None);
        };

        let request = self.http.request(Method::GET, self.user_url.clone()).bearer_auth(token);
        let response = self.http.send(request).await?;

        match response.status() {
            status if status.is_success() => {
                let user: UserPayload = response.json().await.map_err(InfraError::from)?;
                debug!(user_id = %user.id, "session token accepted");
                Ok(Some(Identity::new(user.id, user.email)))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("session token rejected");
                Ok(None)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                warn!(%status, "identity lookup failed");
                Err(LinkBioError::RemoteFailure(format!(
                    "identity lookup failed with HTTP {}: {}",
                    status.as_u16(),
                    body.trim()
                )))
            }
        }
    }
}
