//! Configuration management

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DATA_SERVICE_TIMEOUT_SECS, DEFAULT_LINK_TABLES, DEFAULT_PROFILE_TABLES,
    DEFAULT_THEME_TABLES,
};
use crate::types::LogicalEntity;
use crate::{LinkBioError, Result};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data_service: DataServiceConfig,
    #[serde(default)]
    pub tables: TableConfig,
}

impl Config {
    /// Build a configuration for the given service with default tables.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            data_service: DataServiceConfig::new(url, api_key),
            tables: TableConfig::default(),
        }
    }

    /// Reject configurations that cannot possibly work.
    pub fn validate(&self) -> Result<()> {
        if self.data_service.url.trim().is_empty() {
            return Err(LinkBioError::Config("data service url is empty".into()));
        }
        if self.data_service.api_key.trim().is_empty() {
            return Err(LinkBioError::Config("data service api key is empty".into()));
        }
        if self.data_service.timeout_seconds == 0 {
            return Err(LinkBioError::Config("data service timeout must be positive".into()));
        }
        for entity in LogicalEntity::ALL {
            if self.tables.candidates(entity).iter().all(|name| name.trim().is_empty()) {
                return Err(LinkBioError::Config(format!(
                    "no table candidates configured for {entity}"
                )));
            }
        }
        Ok(())
    }
}

/// Remote data service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataServiceConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Anonymous API key sent with every request
    #[serde(skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Transactional replace functions keyed by physical table name.
    #[serde(default)]
    pub replace_rpc: HashMap<String, String>,
}

impl DataServiceConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout_seconds: DEFAULT_DATA_SERVICE_TIMEOUT_SECS,
            replace_rpc: HashMap::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_DATA_SERVICE_TIMEOUT_SECS
}

/// Physical table candidates per logical entity, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub profile: Vec<String>,
    pub theme: Vec<String>,
    pub links: Vec<String>,
}

impl TableConfig {
    pub fn candidates(&self, entity: LogicalEntity) -> &[String] {
        match entity {
            LogicalEntity::Profile => &self.profile,
            LogicalEntity::Theme => &self.theme,
            LogicalEntity::Links => &self.links,
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        fn owned(names: &[&str]) -> Vec<String> {
            names.iter().map(|name| (*name).to_string()).collect()
        }

        Self {
            profile: owned(DEFAULT_PROFILE_TABLES),
            theme: owned(DEFAULT_THEME_TABLES),
            links: owned(DEFAULT_LINK_TABLES),
        }
    }
}
