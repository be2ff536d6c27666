//! Server shared state
//!
//! Holds the oracle and the audit sink. Both are built once at startup and
//! shared by every connection task.

use crate::audit::{AuditEntry, AuditLog};
use crate::config::Config;
use crate::error::{OracleError, Result};
use crate::oracle::{Bit, QuantumOracle, RandomnessOracle};
use std::sync::Arc;
use tracing::error;

/// Shared state for the HTTP server
pub struct AppState {
    oracle: Arc<dyn RandomnessOracle>,
    audit: AuditLog,
}

impl AppState {
    /// Create state from an already-built oracle and audit log
    pub fn new(oracle: Arc<dyn RandomnessOracle>, audit: AuditLog) -> Self {
        Self { oracle, audit }
    }

    /// Build the quantum oracle and open the audit log named in config
    pub fn from_config(config: &Config) -> Result<Self> {
        let oracle = QuantumOracle::from_config(&config.oracle)?;
        let audit = AuditLog::open(&config.server.log_file)?;
        Ok(Self::new(Arc::new(oracle), audit))
    }

    pub fn oracle_name(&self) -> &'static str {
        self.oracle.name()
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Draw one bit on the blocking pool
    ///
    /// A panic inside the oracle surfaces as [`OracleError::Worker`].
    pub async fn draw_bit(&self) -> std::result::Result<Bit, OracleError> {
        let oracle = Arc::clone(&self.oracle);
        tokio::task::spawn_blocking(move || oracle.generate_bit())
            .await
            .map_err(|e| OracleError::Worker(e.to_string()))?
    }

    /// Append an audit entry on the blocking pool
    ///
    /// Write failures are logged, never returned.
    pub async fn record(&self, entry: AuditEntry) {
        let audit = self.audit.clone();
        match tokio::task::spawn_blocking(move || audit.record(&entry)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(path = %self.audit.path().display(), "Failed to write audit entry: {}", e);
            }
            Err(e) => {
                error!(path = %self.audit.path().display(), "Audit writer aborted: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qrng::pseudo::SeededPseudoBackend;
    use crate::quantum::Simulator;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn test_state() -> (Arc<AppState>, AuditLog, TempDir) {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path().join("audit.txt")).unwrap();
        let oracle =
            QuantumOracle::new(Simulator::new(Arc::new(SeededPseudoBackend::new(3)))).unwrap();
        let state = Arc::new(AppState::new(Arc::new(oracle), audit.clone()));
        (state, audit, dir)
    }

    #[tokio::test]
    async fn test_draw_bit_and_record() {
        let (state, audit, _dir) = test_state();

        let bit = state.draw_bit().await.unwrap();
        state
            .record(AuditEntry::generated(IpAddr::V4(Ipv4Addr::LOCALHOST), bit))
            .await;

        let content = std::fs::read_to_string(audit.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with(&format!("| Resultado: {}\n", bit)));
        assert_eq!(state.oracle_name(), "quantum_simulation");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_contended_audit_write_leaves_runtime_free() {
        let (state, audit, _dir) = test_state();

        // Another writer holds the file until told to let go
        let (locked_tx, locked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let holder = {
            let audit = audit.clone();
            std::thread::spawn(move || {
                let _file = audit.lock();
                locked_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
        };
        locked_rx.recv().unwrap();

        let writer = tokio::spawn({
            let state = Arc::clone(&state);
            async move {
                state
                    .record(AuditEntry::generated(IpAddr::V4(Ipv4Addr::LOCALHOST), Bit::One))
                    .await
            }
        });

        // The only runtime thread still runs other tasks while the write waits
        let other = tokio::spawn(async {
            tokio::task::yield_now().await;
            7
        });
        assert_eq!(other.await.unwrap(), 7);
        assert!(!writer.is_finished());

        release_tx.send(()).unwrap();
        holder.join().unwrap();
        writer.await.unwrap();

        let content = std::fs::read_to_string(audit.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
