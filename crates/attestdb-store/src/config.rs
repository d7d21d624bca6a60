//! Storage configuration: connection target and physical table name.
//!
//! Supplied once at adapter construction and never mutated afterward.
//! Loading and validation follow the usual TOML-file path; the host owns
//! where the file comes from.

use crate::schema::SchemaConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Connection and table settings for the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Endpoint of the backing store, e.g. `http://localhost:8000`.
    /// `None` lets the client resolve its default for the region.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Region-equivalent placement hint for the backing store.
    #[serde(default)]
    pub region: Option<String>,
    /// Physical table name.
    #[serde(default = "default_table_name")]
    pub table_name: String,
}

fn default_table_name() -> String {
    "attestdb".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: None,
            table_name: default_table_name(),
        }
    }
}

impl StorageConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let config: StorageConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration settings.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(anyhow::anyhow!("table_name cannot be empty"));
        }
        if let Some(endpoint) = &self.endpoint {
            if endpoint.trim().is_empty() {
                return Err(anyhow::anyhow!("endpoint cannot be empty when set"));
            }
        }
        Ok(())
    }

    /// The schema layout for this configuration.
    pub fn schema(&self) -> SchemaConfig {
        SchemaConfig::for_table(&self.table_name)
    }
}
