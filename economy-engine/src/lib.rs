//! Life economy engine
//!
//! Host-facing entry point for the life-point ledger and elimination
//! engine. The host routes its combat, token-use, join, and revival
//! events here; the engine routes consequences and notifications back
//! through [`life_ledger::HostHooks`] on the affected actor's owning
//! worker.
//!
//! # Architecture
//!
//! - **Explicit services**: no global state; the engine and everything
//!   under it are constructed values with a lifecycle owned by the host
//! - **Synchronous decisions, scheduled effects**: return values carry
//!   the decision; host-side effects land at most one scheduling hop
//!   later
//! - **Loss then check**: every balance-decreasing entry point runs the
//!   elimination check before yielding control back to the host

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;

// Re-exports
pub use config::EngineConfig;
pub use dispatch::{ActorDispatch, DispatchedHooks};
pub use engine::{EconomyEngine, ExchangeDirection, KillOutcome, LossOutcome, TokenOutcome};
pub use error::{Error, Result};

/// Initialise tracing for an embedding host.
///
/// Respects `RUST_LOG` when set, otherwise falls back to `default_filter`.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
