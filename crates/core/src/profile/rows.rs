//! Conversions between typed records and raw service rows

use linkbio_domain::{LinkBioError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::ports::Row;

/// Decode a service row; a shape mismatch is a malformed payload.
pub(crate) fn decode<T: DeserializeOwned>(row: Row, what: &str) -> Result<T> {
    serde_json::from_value(Value::Object(row))
        .map_err(|e| LinkBioError::RemoteFailure(format!("malformed {what} row: {e}")))
}

pub(crate) fn decode_all<T: DeserializeOwned>(rows: Vec<Row>, what: &str) -> Result<Vec<T>> {
    rows.into_iter().map(|row| decode(row, what)).collect()
}

/// Encode a record as a row. Only struct-like values are accepted.
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Row> {
    match serde_json::to_value(value) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(other) => Err(LinkBioError::Internal(format!("expected an object row, got {other}"))),
        Err(e) => Err(LinkBioError::Internal(format!("failed to encode row: {e}"))),
    }
}
