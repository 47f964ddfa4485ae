//! Error types for the economy engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger or policy error
    #[error("Ledger error: {0}")]
    Ledger(#[from] life_ledger::Error),

    /// Elimination store error
    #[error("Store error: {0}")]
    Store(#[from] elimination::Error),

    /// Metrics registration error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
