//! Metrics collection for observability
//!
//! Prometheus metrics for monitoring the life economy.
//!
//! # Metrics
//!
//! - `life_transfers_total` - Kill transfers applied
//! - `life_eliminations_total` - Actors eliminated
//! - `life_revivals_total` - Actors revived
//! - `life_tokens_minted_total` - Tokens minted by withdraws
//! - `life_tokens_deposited_total` - Tokens consumed by deposits
//! - `life_eliminated_actors` - Actors currently eliminated

use prometheus::{IntCounter, IntGauge, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Kill transfers applied
    pub transfers_total: IntCounter,

    /// Actors eliminated
    pub eliminations_total: IntCounter,

    /// Actors revived
    pub revivals_total: IntCounter,

    /// Tokens minted by withdraws
    pub tokens_minted_total: IntCounter,

    /// Tokens consumed by deposits
    pub tokens_deposited_total: IntCounter,

    /// Actors currently eliminated
    pub eliminated_actors: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create a collector on a dedicated registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let transfers_total =
            IntCounter::new("life_transfers_total", "Kill transfers applied")?;
        registry.register(Box::new(transfers_total.clone()))?;

        let eliminations_total =
            IntCounter::new("life_eliminations_total", "Actors eliminated")?;
        registry.register(Box::new(eliminations_total.clone()))?;

        let revivals_total = IntCounter::new("life_revivals_total", "Actors revived")?;
        registry.register(Box::new(revivals_total.clone()))?;

        let tokens_minted_total = IntCounter::new(
            "life_tokens_minted_total",
            "Tokens minted by withdraws",
        )?;
        registry.register(Box::new(tokens_minted_total.clone()))?;

        let tokens_deposited_total = IntCounter::new(
            "life_tokens_deposited_total",
            "Tokens consumed by deposits",
        )?;
        registry.register(Box::new(tokens_deposited_total.clone()))?;

        let eliminated_actors =
            IntGauge::new("life_eliminated_actors", "Actors currently eliminated")?;
        registry.register(Box::new(eliminated_actors.clone()))?;

        Ok(Self {
            transfers_total,
            eliminations_total,
            revivals_total,
            tokens_minted_total,
            tokens_deposited_total,
            eliminated_actors,
            registry,
        })
    }

    /// Record a kill transfer
    pub fn record_transfer(&self) {
        self.transfers_total.inc();
    }

    /// Record an elimination transition
    pub fn record_elimination(&self) {
        self.eliminations_total.inc();
        self.eliminated_actors.inc();
    }

    /// Record a revival transition
    pub fn record_revival(&self) {
        self.revivals_total.inc();
        self.eliminated_actors.dec();
    }

    /// Record tokens minted by a successful withdraw
    pub fn record_tokens_minted(&self, count: u32) {
        self.tokens_minted_total.inc_by(u64::from(count));
    }

    /// Record tokens consumed by a deposit
    pub fn record_tokens_deposited(&self, count: u32) {
        self.tokens_deposited_total.inc_by(u64::from(count));
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
