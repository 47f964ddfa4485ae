//! Policy configuration
//!
//! `PolicyConfig` is an immutable snapshot of the tunable limits.
//! `PolicyHandle` publishes a snapshot to all consumers and swaps it
//! atomically on reload; readers never observe a partial update, and a
//! reload triggers no rebalancing of existing balances.

use crate::types::EliminationMode;
use crate::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tunable limits for the life economy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Balance a record is lazily created with on first access
    pub default_balance: f64,

    /// Minimum balance after any completed mutation
    pub floor: f64,

    /// Whether the ceiling is enforced
    pub ceiling_enabled: bool,

    /// Maximum balance after any completed mutation (when enabled)
    pub ceiling: f64,

    /// Loss applied on a natural-cause death
    pub natural_loss: f64,

    /// Loss applied on a monster death
    pub monster_loss: f64,

    /// Loss leg of a kill transfer
    pub kill_loss: f64,

    /// Gain leg of a kill transfer
    pub kill_gain: f64,

    /// Life points per token
    pub token_exchange_rate: f64,

    /// Whether crossing the floor eliminates the actor
    pub elimination_enabled: bool,

    /// Consequence applied on elimination
    pub elimination_mode: EliminationMode,

    /// Balance restored on revival (overwrites any residual balance)
    pub revival_balance: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            default_balance: 20.0,
            floor: 2.0,
            ceiling_enabled: true,
            ceiling: 40.0,
            natural_loss: 1.0,
            monster_loss: 1.0,
            kill_loss: 2.0,
            kill_gain: 2.0,
            token_exchange_rate: 2.0,
            elimination_enabled: true,
            elimination_mode: EliminationMode::Exile,
            revival_balance: 20.0,
        }
    }
}

impl PolicyConfig {
    /// Check field bounds and cross-field consistency
    pub fn validate(&self) -> Result<()> {
        if self.floor < 0.0 {
            return Err(Error::Config(format!(
                "floor must be >= 0, got {}",
                self.floor
            )));
        }
        if self.ceiling_enabled && self.ceiling <= self.floor {
            return Err(Error::Config(format!(
                "ceiling {} must be greater than floor {}",
                self.ceiling, self.floor
            )));
        }
        if self.default_balance < self.floor {
            return Err(Error::Config(format!(
                "default_balance {} is below floor {}",
                self.default_balance, self.floor
            )));
        }
        if self.ceiling_enabled && self.default_balance > self.ceiling {
            return Err(Error::Config(format!(
                "default_balance {} is above ceiling {}",
                self.default_balance, self.ceiling
            )));
        }
        for (name, value) in [
            ("natural_loss", self.natural_loss),
            ("monster_loss", self.monster_loss),
            ("kill_loss", self.kill_loss),
            ("kill_gain", self.kill_gain),
        ] {
            if value < 0.0 {
                return Err(Error::Config(format!("{name} must be >= 0, got {value}")));
            }
        }
        if self.token_exchange_rate <= 0.0 {
            return Err(Error::Config(format!(
                "token_exchange_rate must be positive, got {}",
                self.token_exchange_rate
            )));
        }
        if self.revival_balance <= 0.0 {
            return Err(Error::Config(format!(
                "revival_balance must be positive, got {}",
                self.revival_balance
            )));
        }
        Ok(())
    }

    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PolicyConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults with environment variable overrides
    pub fn from_env() -> Result<Self> {
        let mut config = PolicyConfig::default();

        if let Ok(floor) = std::env::var("LIFE_FLOOR") {
            config.floor = floor
                .parse()
                .map_err(|e| Error::Config(format!("LIFE_FLOOR: {e}")))?;
        }

        if let Ok(ceiling) = std::env::var("LIFE_CEILING") {
            config.ceiling = ceiling
                .parse()
                .map_err(|e| Error::Config(format!("LIFE_CEILING: {e}")))?;
        }

        if let Ok(mode) = std::env::var("LIFE_ELIMINATION_MODE") {
            config.elimination_mode = match mode.as_str() {
                "exile" => EliminationMode::Exile,
                "restrict" => EliminationMode::Restrict,
                other => {
                    return Err(Error::Config(format!(
                        "LIFE_ELIMINATION_MODE: unknown mode {other:?}"
                    )))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }
}

/// Shared, atomically reloadable policy snapshot
#[derive(Debug, Clone)]
pub struct PolicyHandle {
    inner: Arc<RwLock<Arc<PolicyConfig>>>,
}

impl PolicyHandle {
    /// Validate and publish the initial snapshot
    pub fn new(config: PolicyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(Arc::new(config))),
        })
    }

    /// Current snapshot.
    ///
    /// Callers hold the returned `Arc` for the duration of one logical
    /// operation so every comparison inside it sees the same limits.
    pub fn current(&self) -> Arc<PolicyConfig> {
        self.inner.read().clone()
    }

    /// Validate and atomically swap in a new snapshot.
    ///
    /// Only future operations see the new limits; existing balances are
    /// not rebalanced.
    pub fn replace(&self, config: PolicyConfig) -> Result<()> {
        config.validate()?;
        *self.inner.write() = Arc::new(config);
        tracing::info!("Policy snapshot replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(PolicyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_ceiling_must_exceed_floor() {
        let config = PolicyConfig {
            floor: 10.0,
            ceiling: 5.0,
            ceiling_enabled: true,
            default_balance: 10.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_ceiling_not_checked() {
        let config = PolicyConfig {
            floor: 10.0,
            ceiling: 5.0,
            ceiling_enabled: false,
            default_balance: 10.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let config = PolicyConfig {
            token_exchange_rate: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.toml");
        std::fs::write(
            &path,
            "floor = 1.0\nceiling = 30.0\nkill_loss = 3.0\n",
        )
        .unwrap();

        let config = PolicyConfig::from_file(&path).unwrap();
        assert_eq!(config.floor, 1.0);
        assert_eq!(config.ceiling, 30.0);
        assert_eq!(config.kill_loss, 3.0);
        // Unspecified fields keep their defaults
        assert_eq!(config.kill_gain, 2.0);
    }

    #[test]
    fn test_handle_replace_is_atomic_snapshot() {
        let handle = PolicyHandle::new(PolicyConfig::default()).unwrap();
        let before = handle.current();

        let mut updated = PolicyConfig::default();
        updated.kill_loss = 5.0;
        handle.replace(updated).unwrap();

        // The old snapshot is unchanged; new reads see the new limits.
        assert_eq!(before.kill_loss, 2.0);
        assert_eq!(handle.current().kill_loss, 5.0);
    }

    #[test]
    fn test_handle_rejects_invalid_replace() {
        let handle = PolicyHandle::new(PolicyConfig::default()).unwrap();
        let bad = PolicyConfig {
            revival_balance: -1.0,
            ..Default::default()
        };
        assert!(handle.replace(bad).is_err());
        // Previous snapshot still in effect
        assert_eq!(handle.current().revival_balance, 20.0);
    }
}
