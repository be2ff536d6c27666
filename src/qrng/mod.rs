//! Entropy backends for the measurement step
//!
//! The simulator collapses a qubit by comparing a uniform draw against the
//! outcome probability. Where that draw comes from is a `QrngBackend`.
//!
//! ## Flex Point
//! Adding a new backend requires:
//! 1. Implement `QrngBackend` in a new file under `src/qrng/`
//! 2. Add a match arm to [`get_backend`] and an entry to [`available_backends`]

pub mod pseudo;

use crate::error::OracleError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Source of uniform random data for measurements
///
/// Implementations must be thread-safe (Send + Sync): one instance is shared
/// by every request handler.
pub trait QrngBackend: Send + Sync {
    /// Returns the backend name (e.g., "pseudo", "seeded")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of this backend
    fn description(&self) -> &'static str;

    /// Generate n random bytes
    fn bytes(&self, n: usize) -> Result<Vec<u8>, OracleError>;

    /// Generate a single random float uniformly distributed in [0.0, 1.0)
    ///
    /// Default implementation uses 4 bytes to create a u32, then divides by 2^32.
    fn float(&self) -> Result<f64, OracleError> {
        let bytes = self.bytes(4)?;
        let raw: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
            OracleError::Entropy(format!("expected 4 bytes, got {}", bytes.len()))
        })?;
        Ok(u32::from_be_bytes(raw) as f64 / 4_294_967_296.0)
    }
}

/// Information about a backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Backend name (used in config)
    pub name: String,
    /// Human-readable description
    pub description: String,
}

/// Get a backend by name
///
/// `seed` only matters for the seeded backend; without one it starts from 0.
/// Unknown names fall back to the pseudo backend with a warning.
pub fn get_backend(name: &str, seed: Option<u64>) -> Arc<dyn QrngBackend> {
    match name {
        "seeded" => Arc::new(pseudo::SeededPseudoBackend::new(seed.unwrap_or(0))),
        "pseudo" => Arc::new(pseudo::PseudoBackend::new()),
        other => {
            warn!("Unknown entropy backend '{}', using pseudo", other);
            Arc::new(pseudo::PseudoBackend::new())
        }
    }
}

/// Whether `name` is one of [`available_backends`]
pub fn is_available(name: &str) -> bool {
    available_backends().iter().any(|info| info.name == name)
}

/// List all available backends with their info
pub fn available_backends() -> Vec<BackendInfo> {
    vec![
        BackendInfo {
            name: "pseudo".to_string(),
            description: "Thread-local pseudo-random number generator".to_string(),
        },
        BackendInfo {
            name: "seeded".to_string(),
            description: "Seeded pseudo-random number generator (reproducible)".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_backend_by_name() {
        assert_eq!(get_backend("pseudo", None).name(), "pseudo");
        assert_eq!(get_backend("seeded", Some(7)).name(), "seeded");
    }

    #[test]
    fn test_unknown_backend_falls_back_to_pseudo() {
        assert_eq!(get_backend("hardware", None).name(), "pseudo");
    }

    #[test]
    fn test_is_available() {
        assert!(is_available("pseudo"));
        assert!(is_available("seeded"));
        assert!(!is_available("hardware"));
        assert!(!is_available(""));
    }

    #[test]
    fn test_available_backends_match_registry() {
        for info in available_backends() {
            assert_eq!(get_backend(&info.name, None).name(), info.name);
        }
    }
}
