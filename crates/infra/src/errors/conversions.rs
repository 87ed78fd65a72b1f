//! Conversions from external infrastructure errors into domain errors.

use linkbio_domain::LinkBioError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use thiserror::Error;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(#[from] pub LinkBioError);

impl From<InfraError> for LinkBioError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoLinkBioError {
    fn into_linkbio(self) -> LinkBioError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → LinkBioError */
/* -------------------------------------------------------------------------- */

impl IntoLinkBioError for HttpError {
    fn into_linkbio(self) -> LinkBioError {
        if self.is_timeout() {
            return LinkBioError::RemoteFailure("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return LinkBioError::RemoteFailure("HTTP connection failure".into());
        }

        if self.is_builder() {
            return LinkBioError::Config(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => LinkBioError::Unauthenticated,
                404 => LinkBioError::NotFound(message),
                409 => LinkBioError::Conflict(message),
                _ => LinkBioError::RemoteFailure(message),
            };
        }

        if self.is_decode() {
            return LinkBioError::RemoteFailure(format!("malformed response body: {self}"));
        }

        LinkBioError::RemoteFailure(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_linkbio())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → LinkBioError */
/* -------------------------------------------------------------------------- */

impl IntoLinkBioError for JsonError {
    fn into_linkbio(self) -> LinkBioError {
        LinkBioError::RemoteFailure(format!("malformed response body: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_linkbio())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → LinkBioError */
/* -------------------------------------------------------------------------- */

impl IntoLinkBioError for UrlError {
    fn into_linkbio(self) -> LinkBioError {
        LinkBioError::Config(format!("invalid data service url: {self}"))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        InfraError(value.into_linkbio())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
