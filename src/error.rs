//! Error types for qbit-server

use thiserror::Error;

/// Main error type for qbit-server operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// Bind/listen failure. Fatal: the server never starts serving.
    #[error("Startup error: {0}")]
    Startup(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of the randomness step
///
/// Request-scoped: the dispatcher turns it into a 500 response and an
/// audit line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("invalid circuit: {0}")]
    Circuit(String),

    #[error("simulation failed: {0}")]
    Simulation(String),

    #[error("entropy source failed: {0}")]
    Entropy(String),

    #[error("could not decode measurement: {0}")]
    Decode(String),

    #[error("oracle worker aborted: {0}")]
    Worker(String),
}

/// Result type alias for qbit-server operations
pub type Result<T> = std::result::Result<T, Error>;
