//! LifeLedger Core
//!
//! Authoritative life-point balances for every actor in a session.
//!
//! # Architecture
//!
//! - **Single authority**: all balance mutation goes through [`LifeLedger`]
//! - **Invariant enforcement**: `floor <= balance <= ceiling` holds after
//!   every completed operation
//! - **Reported clamping**: a mutation absorbed by a boundary is a normal
//!   outcome carried in the return value, never an error
//! - **Ordered dual-lock transfer**: the kill transfer touches two records
//!   atomically without risking cross-transfer deadlock

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod error;
pub mod host;
pub mod ledger;
pub mod metrics;
pub mod types;

// Re-exports
pub use config::{PolicyConfig, PolicyHandle};
pub use error::{Error, Result};
pub use host::{HostHooks, NullHooks};
pub use ledger::LifeLedger;
pub use metrics::Metrics;
pub use types::{
    ActorId, EliminationMode, LifeEvent, LifeRecord, TransferResult, BALANCE_EPSILON,
};
