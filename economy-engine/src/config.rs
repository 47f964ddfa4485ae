//! Configuration for the economy engine

use crate::{Error, Result};
use life_ledger::PolicyConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Data directory for the elimination roster
    pub data_dir: PathBuf,

    /// Collection name the roster record is keyed by
    pub collection: String,

    /// Life economy policy
    pub policy: PolicyConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/lifeledger"),
            collection: "eliminated".to_string(),
            policy: PolicyConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.policy.validate()?;
        Ok(config)
    }

    /// Load defaults with environment variable overrides
    pub fn from_env() -> Result<Self> {
        let mut config = EngineConfig::default();

        if let Ok(data_dir) = std::env::var("LIFELEDGER_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(collection) = std::env::var("LIFELEDGER_COLLECTION") {
            config.collection = collection;
        }

        config.policy = PolicyConfig::from_env()?;
        Ok(config)
    }
}
