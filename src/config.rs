//! Configuration
//!
//! Loader facade for the catalog's runtime configuration: an optional TOML
//! file overlaid with `SHELFTREE_*` environment variables.

use crate::error::{ListError, Result};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub state_store: StateStoreConfig,
}

/// Node-state store location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateStoreConfig {
    /// Directory of the node-state store; platform data directory when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StateStoreConfig {
    /// The configured path, or the platform default
    /// (`<data dir>/shelftree/node_state`).
    pub fn resolved_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let dirs = directories::ProjectDirs::from("", "shelftree", "shelftree").ok_or_else(
            || ListError::Config("could not determine platform data directory".to_string()),
        )?;
        Ok(dirs.data_dir().join("node_state"))
    }
}

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an optional file and the environment.
    /// Environment variables win: `SHELFTREE_STATE_STORE__PATH` overrides
    /// `[state_store] path`.
    pub fn load(file: Option<&Path>) -> Result<CatalogConfig> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        builder
            .add_source(config::Environment::with_prefix("SHELFTREE").separator("__"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ListError::Config(e.to_string()))
    }

    /// Write a default configuration file for first-run setups.
    pub fn write_default(path: &Path) -> Result<()> {
        let rendered = toml::to_string_pretty(&CatalogConfig::default())
            .map_err(|e| ListError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(crate::error::StorageError::Io)?;
        }
        std::fs::write(path, rendered).map_err(crate::error::StorageError::Io)?;
        Ok(())
    }
}
