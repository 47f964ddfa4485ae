//! Elimination state machine and durable roster
//!
//! An actor is `Active` (no record) or `Eliminated` (record present).
//! The roster outlives sessions: actors may stay disconnected for
//! arbitrarily long and the system must recall their state without
//! requiring them to be present.
//!
//! - **Write-through**: every roster mutation persists immediately
//! - **Availability over durability**: a failed durable write is logged
//!   and the in-memory transition stands
//! - **Idempotent transitions**: repeat triggers report `false`, they do
//!   not re-fire consequences

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod engine;
pub mod error;
pub mod store;

pub use engine::EliminationEngine;
pub use error::{Error, Result};
pub use store::EliminationStore;
