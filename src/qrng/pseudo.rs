//! Pseudo-random backends
//!
//! Uses the `rand` crate. This is NOT a verified entropy source; the service
//! only promises a statistically fair 50/50 measurement.

use crate::error::OracleError;
use crate::qrng::QrngBackend;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::Mutex;

/// Pseudo-random number generator backend
///
/// Stateless: every call goes to the calling thread's `ThreadRng`, so
/// concurrent measurements never contend.
#[derive(Debug, Default)]
pub struct PseudoBackend;

impl PseudoBackend {
    /// Create a new pseudo-random backend
    pub fn new() -> Self {
        Self
    }
}

impl QrngBackend for PseudoBackend {
    fn name(&self) -> &'static str {
        "pseudo"
    }

    fn description(&self) -> &'static str {
        "Thread-local pseudo-random number generator"
    }

    fn bytes(&self, n: usize) -> Result<Vec<u8>, OracleError> {
        let mut bytes = vec![0u8; n];
        rand::thread_rng().fill_bytes(&mut bytes);
        Ok(bytes)
    }

    fn float(&self) -> Result<f64, OracleError> {
        Ok(rand::thread_rng().gen::<f64>())
    }
}

/// Seeded pseudo-random backend for reproducible runs
///
/// The lock is held only for the draw itself.
pub struct SeededPseudoBackend {
    rng: Mutex<rand::rngs::StdRng>,
}

impl SeededPseudoBackend {
    /// Create a new seeded pseudo-random backend
    ///
    /// Using the same seed will produce the same sequence of random values.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(rand::rngs::StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut rand::rngs::StdRng) -> T) -> Result<T, OracleError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| OracleError::Entropy("seeded RNG lock poisoned".to_string()))?;
        Ok(f(&mut rng))
    }
}

impl QrngBackend for SeededPseudoBackend {
    fn name(&self) -> &'static str {
        "seeded"
    }

    fn description(&self) -> &'static str {
        "Seeded pseudo-random number generator (reproducible)"
    }

    fn bytes(&self, n: usize) -> Result<Vec<u8>, OracleError> {
        self.with_rng(|rng| {
            let mut bytes = vec![0u8; n];
            rng.fill_bytes(&mut bytes);
            bytes
        })
    }

    fn float(&self) -> Result<f64, OracleError> {
        self.with_rng(|rng| rng.gen::<f64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_backend_bytes() {
        let backend = PseudoBackend::new();
        let bytes = backend.bytes(100).unwrap();
        assert_eq!(bytes.len(), 100);
    }

    #[test]
    fn test_pseudo_backend_float_in_range() {
        let backend = PseudoBackend::new();
        for _ in 0..1000 {
            let f = backend.float().unwrap();
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn test_seeded_backend_reproducible() {
        let backend1 = SeededPseudoBackend::new(42);
        let backend2 = SeededPseudoBackend::new(42);

        assert_eq!(backend1.bytes(100).unwrap(), backend2.bytes(100).unwrap());
        assert_eq!(backend1.float().unwrap(), backend2.float().unwrap());
    }

    #[test]
    fn test_default_float_uses_four_bytes() {
        struct Fixed;
        impl QrngBackend for Fixed {
            fn name(&self) -> &'static str {
                "fixed"
            }
            fn description(&self) -> &'static str {
                "fixed bytes"
            }
            fn bytes(&self, n: usize) -> Result<Vec<u8>, OracleError> {
                Ok(vec![0x80; n])
            }
        }

        // 0x80808080 / 2^32
        let f = Fixed.float().unwrap();
        assert!((f - 0.502_0).abs() < 1e-3, "got {}", f);
    }
}
