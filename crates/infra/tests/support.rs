//! Shared helpers for `linkbio-infra` integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use linkbio_domain::DataServiceConfig;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use wiremock::MockServer;

pub const API_KEY: &str = "anon-key";
pub const SESSION_TOKEN: &str = "session-jwt";

/// Data service configuration pointing at a mock server.
pub fn config_for(server: &MockServer) -> DataServiceConfig {
    let mut config = DataServiceConfig::new(server.uri(), API_KEY);
    config.timeout_seconds = 5;
    config
}

/// PostgREST body for a table missing from the schema cache.
pub fn missing_table(table: &str) -> Value {
    json!({
        "code": "PGRST205",
        "details": null,
        "hint": null,
        "message": format!("Could not find the table 'public.{table}' in the schema cache"),
    })
}

pub fn profile_json(id: &str, owner: &str, username: &str) -> Value {
    json!({
        "id": id,
        "user_id": owner,
        "username": username,
        "title": "Engineer",
        "bio": null,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z",
    })
}

/// Write `contents` to a temporary file with the given extension.
///
/// The returned guard must be kept alive for as long as the path is used.
pub fn config_file(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    (temp_file, path)
}
