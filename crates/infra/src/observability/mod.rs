//! Observability infrastructure for structured logging
//!
//! Everything in the workspace logs through `tracing`. Hosts that do not
//! install their own subscriber call [`init_tracing`] once at startup.
//!
//! The filter defaults to `info` and is overridden by `RUST_LOG`, e.g.
//! `RUST_LOG=linkbio_core=debug,linkbio_infra=debug`.

use std::str::FromStr;

use linkbio_domain::{LinkBioError, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, for terminals
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = LinkBioError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(LinkBioError::Config(format!("unknown log format: {other}"))),
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global `tracing` subscriber.
///
/// Returns `false` when a subscriber was already installed, so calling
/// this more than once (e.g. from tests) is harmless.
pub fn init_tracing(format: LogFormat) -> bool {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter()).with_target(true);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };

    installed.is_ok()
}
