//! PostgREST error payload classification
//!
//! The service reports failures as `{ code, message, details, hint }`. The
//! code decides which domain error a failure maps to; most importantly a
//! missing table must become `RelationNotFound` so table resolution can fall
//! through to the next candidate.

use linkbio_domain::LinkBioError;
use reqwest::StatusCode;
use serde::Deserialize;

/// Table missing from the schema cache.
pub const CODE_TABLE_NOT_IN_CACHE: &str = "PGRST205";
/// `undefined_table` from the database itself.
pub const CODE_UNDEFINED_TABLE: &str = "42P01";
/// Singular response requested but zero rows matched.
pub const CODE_NO_ROWS: &str = "PGRST116";
/// `unique_violation`.
pub const CODE_UNIQUE_VIOLATION: &str = "23505";
/// JWT missing, expired or invalid.
pub const CODE_JWT_INVALID: &str = "PGRST301";

/// Error body returned by the data service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostgrestError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl PostgrestError {
    /// Parse an error body. Non-JSON bodies are kept as the message.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            message: Some(body.trim().to_string()).filter(|message| !message.is_empty()),
            ..Self::default()
        })
    }

    fn code(&self) -> &str {
        self.code.as_deref().unwrap_or_default()
    }

    fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// True when the payload says the addressed table does not exist.
    pub fn is_missing_table(&self) -> bool {
        let code = self.code();
        if code == CODE_TABLE_NOT_IN_CACHE || code == CODE_UNDEFINED_TABLE {
            return true;
        }
        let message = self.message().to_ascii_lowercase();
        message.contains("could not find the table")
            || (message.contains("relation") && message.contains("does not exist"))
    }

    fn describe(&self, status: StatusCode) -> String {
        let mut text = format!("HTTP {}", status.as_u16());
        if !self.code().is_empty() {
            text.push_str(&format!(" [{}]", self.code()));
        }
        if !self.message().is_empty() {
            text.push_str(&format!(": {}", self.message()));
        }
        if let Some(details) = self.details.as_deref().filter(|d| !d.is_empty()) {
            text.push_str(&format!(" ({details})"));
        }
        text
    }

    /// Map this failure on `target` into the domain taxonomy.
    pub fn classify(&self, status: StatusCode, target: &str) -> LinkBioError {
        if self.is_missing_table() {
            return LinkBioError::RelationNotFound(target.to_string());
        }

        let code = self.code();
        if code == CODE_NO_ROWS {
            return LinkBioError::NotFound(format!("no rows in {target}"));
        }
        if code == CODE_UNIQUE_VIOLATION || status == StatusCode::CONFLICT {
            return LinkBioError::Conflict(format!("{target}: {}", self.describe(status)));
        }
        if code == CODE_JWT_INVALID || status == StatusCode::UNAUTHORIZED {
            return LinkBioError::Unauthenticated;
        }

        LinkBioError::RemoteFailure(format!("{target}: {}", self.describe(status)))
    }
}
