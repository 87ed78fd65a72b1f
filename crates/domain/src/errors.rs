//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for LinkBio
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum LinkBioError {
    /// No identity available at call time.
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    /// A single physical table is missing. Only the table resolver should
    /// observe this; it either falls through or turns it into
    /// [`LinkBioError::SchemaMismatch`].
    #[error("Relation not found: {0}")]
    RelationNotFound(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Multiple rows returned: {0}")]
    MultipleRows(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Remote failure: {0}")]
    RemoteFailure(String),

    /// Remote state no longer matches what the caller submitted and was not
    /// rolled back.
    #[error("Partial write left remote state inconsistent: {0}")]
    PartialWriteInconsistency(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinkBioError {
    /// True for the "table does not exist" class of service errors.
    pub fn is_relation_not_found(&self) -> bool {
        matches!(self, Self::RelationNotFound(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<crate::validation::ValidationError> for LinkBioError {
    fn from(err: crate::validation::ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Result type alias for LinkBio operations
pub type Result<T> = std::result::Result<T, LinkBioError>;
