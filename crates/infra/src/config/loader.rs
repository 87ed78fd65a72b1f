//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment, if one exists
//! 2. Attempts to load from environment variables
//! 3. If incomplete, falls back to loading from file
//! 4. Probes multiple paths for config files (JSON or TOML)
//!
//! ## Environment Variables
//! - `LINKBIO_DATA_URL`: Data service base URL (required)
//! - `LINKBIO_DATA_API_KEY`: Data service API key (required)
//! - `LINKBIO_DATA_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `LINKBIO_PROFILE_TABLES`: Comma separated profile table candidates
//! - `LINKBIO_THEME_TABLES`: Comma separated theme table candidates
//! - `LINKBIO_LINK_TABLES`: Comma separated link table candidates
//! - `LINKBIO_LINKS_REPLACE_RPC`: Transactional replace function for links
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./linkbio.json` or `./linkbio.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use linkbio_domain::{Config, DataServiceConfig, LinkBioError, Result, TableConfig};

pub const ENV_DATA_URL: &str = "LINKBIO_DATA_URL";
pub const ENV_DATA_API_KEY: &str = "LINKBIO_DATA_API_KEY";
pub const ENV_DATA_TIMEOUT_SECS: &str = "LINKBIO_DATA_TIMEOUT_SECS";
pub const ENV_PROFILE_TABLES: &str = "LINKBIO_PROFILE_TABLES";
pub const ENV_THEME_TABLES: &str = "LINKBIO_THEME_TABLES";
pub const ENV_LINK_TABLES: &str = "LINKBIO_LINK_TABLES";
pub const ENV_LINKS_REPLACE_RPC: &str = "LINKBIO_LINKS_REPLACE_RPC";

/// Load configuration with automatic fallback strategy
///
/// Reads `.env` first, then attempts the environment. If any required
/// variable is missing, falls back to a config file. The result is
/// validated either way.
///
/// # Errors
/// Returns `LinkBioError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or fail validation
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// `LINKBIO_DATA_URL` and `LINKBIO_DATA_API_KEY` are required; everything
/// else falls back to defaults.
///
/// # Errors
/// Returns `LinkBioError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let url = env_var(ENV_DATA_URL)?;
    let api_key = env_var(ENV_DATA_API_KEY)?;

    let mut data_service = DataServiceConfig::new(url, api_key);
    if let Ok(raw) = std::env::var(ENV_DATA_TIMEOUT_SECS) {
        data_service.timeout_seconds = raw
            .trim()
            .parse::<u64>()
            .map_err(|e| LinkBioError::Config(format!("Invalid data service timeout: {}", e)))?;
    }

    let defaults = TableConfig::default();
    let tables = TableConfig {
        profile: env_list(ENV_PROFILE_TABLES).unwrap_or(defaults.profile),
        theme: env_list(ENV_THEME_TABLES).unwrap_or(defaults.theme),
        links: env_list(ENV_LINK_TABLES).unwrap_or(defaults.links),
    };

    if let Some(function) = std::env::var(ENV_LINKS_REPLACE_RPC)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    {
        for table in &tables.links {
            data_service.replace_rpc.insert(table.clone(), function.clone());
        }
    }

    Ok(Config { data_service, tables })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `LinkBioError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(LinkBioError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            LinkBioError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| LinkBioError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| LinkBioError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| LinkBioError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(LinkBioError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 6] = [
        "config.json",
        "config.toml",
        "linkbio.json",
        "linkbio.toml",
        "../config.json",
        "../config.toml",
    ];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `LinkBioError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            LinkBioError::Config(format!("Missing required environment variable: {}", key))
        })
}

/// Parse a comma separated list, `None` when unset or empty.
fn env_list(key: &str) -> Option<Vec<String>> {
    let raw = std::env::var(key).ok()?;
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}
