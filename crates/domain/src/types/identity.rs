//! Authenticated caller identity

use serde::{Deserialize, Serialize};

use crate::constants::FALLBACK_USERNAME;

/// Identity reported by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self { id: id.into(), email }
    }

    /// Part of the email before the first `@`, if non-empty.
    pub fn email_local_part(&self) -> Option<&str> {
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .map(str::trim)
            .filter(|local| !local.is_empty())
    }

    /// Username given to a lazily created profile.
    pub fn default_username(&self) -> String {
        self.email_local_part().unwrap_or(FALLBACK_USERNAME).to_string()
    }
}
