//! Error types for the ledger crate
//!
//! Domain outcomes (clamping, rejection, idempotent no-ops) are return
//! values, not errors; this enum only covers configuration and IO faults.

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
