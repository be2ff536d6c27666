//! qbit-server: Quantum Random Bit Server
//!
//! An HTTP service that answers `GET /generate_bit` with one bit drawn from a
//! simulated quantum measurement, and appends an audit line per request.
//!
//! ## Features
//!
//! - State-vector circuit simulator (H, X, Z, CX, measurement)
//! - Hadamard-and-measure oracle: one shot, one fair bit
//! - Concurrent axum server with per-request failure isolation
//! - Append-only audit log safe under concurrent writers
//! - Remote client with local fallback, plus a CLI
//!
//! Not a cryptographic randomness source: measurements are driven by a
//! pseudo-random generator.
//!
//! ## Quick Start
//!
//! ```rust
//! use qbit_server::oracle::{QuantumOracle, RandomnessOracle};
//! use qbit_server::qrng::pseudo::PseudoBackend;
//! use qbit_server::quantum::Simulator;
//! use std::sync::Arc;
//!
//! let oracle = QuantumOracle::new(Simulator::new(Arc::new(PseudoBackend::new()))).unwrap();
//! let bit = oracle.generate_bit().unwrap();
//! assert!(bit.as_u8() <= 1);
//! ```

pub mod audit;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod entropy;
pub mod error;
pub mod oracle;
pub mod qrng;
pub mod quantum;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, OracleError, Result};
pub use oracle::{Bit, BitResult, RandomnessOracle};
