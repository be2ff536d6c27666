//! Per-request audit log
//!
//! Append-only text file, one line per request:
//!
//! ```text
//! 2024-05-17 09:04:07 | Petición Cuántica desde 203.0.113.9 | Resultado: 1
//! 2024-05-17 09:04:08 | Error Cuántico desde 203.0.113.9: simulation failed: ...
//! ```
//!
//! Writers share one file handle behind a mutex and emit each line with a
//! single `write_all`, so concurrent requests never interleave partial lines.

use crate::constants::time::AUDIT_FORMAT;
use crate::error::Result;
use crate::oracle::Bit;
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// What happened to one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    Generated(Bit),
    Failed(String),
}

/// One audit record
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub timestamp: DateTime<Local>,
    pub client: IpAddr,
    pub outcome: AuditOutcome,
}

impl AuditEntry {
    pub fn generated(client: IpAddr, bit: Bit) -> Self {
        Self {
            timestamp: Local::now(),
            client,
            outcome: AuditOutcome::Generated(bit),
        }
    }

    pub fn failed(client: IpAddr, error: impl ToString) -> Self {
        Self {
            timestamp: Local::now(),
            client,
            outcome: AuditOutcome::Failed(error.to_string()),
        }
    }

    /// Render as a single line, without the trailing newline
    pub fn to_line(&self) -> String {
        let message = match &self.outcome {
            AuditOutcome::Generated(bit) => {
                format!("Petición Cuántica desde {} | Resultado: {}", self.client, bit)
            }
            AuditOutcome::Failed(error) => {
                format!("Error Cuántico desde {}: {}", self.client, single_line(error))
            }
        };
        format!("{} | {}", self.timestamp.format(AUDIT_FORMAT), message)
    }
}

fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shared handle to the audit file
///
/// Cloning is cheap; all clones append to the same file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl AuditLog {
    /// Open `path` for appending, creating it (and its parent directory) if needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Exclusive access to the file handle
    ///
    /// Poisoning leaves the handle usable.
    pub(crate) fn lock(&self) -> MutexGuard<'_, File> {
        self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append one entry
    ///
    /// Blocks while another writer holds the file; async callers should run
    /// it on the blocking pool.
    pub fn record(&self, entry: &AuditEntry) -> Result<()> {
        let mut line = entry.to_line();
        line.push('\n');

        let mut file = self.lock();
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::net::Ipv4Addr;
    use tempfile::TempDir;

    fn client() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9))
    }

    #[test]
    fn test_success_line_format() {
        let entry = AuditEntry {
            timestamp: Local.with_ymd_and_hms(2024, 5, 17, 9, 4, 7).unwrap(),
            client: client(),
            outcome: AuditOutcome::Generated(Bit::One),
        };

        assert_eq!(
            entry.to_line(),
            "2024-05-17 09:04:07 | Petición Cuántica desde 203.0.113.9 | Resultado: 1"
        );
    }

    #[test]
    fn test_failure_line_is_single_line() {
        let entry = AuditEntry {
            timestamp: Local.with_ymd_and_hms(2024, 5, 17, 9, 4, 8).unwrap(),
            client: client(),
            outcome: AuditOutcome::Failed("backend down\nretry later\r\n".to_string()),
        };

        assert_eq!(
            entry.to_line(),
            "2024-05-17 09:04:08 | Error Cuántico desde 203.0.113.9: backend down retry later"
        );
    }

    #[test]
    fn test_open_creates_parent_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("audit.txt");

        let log = AuditLog::open(&path).unwrap();
        log.record(&AuditEntry::generated(client(), Bit::Zero)).unwrap();

        // Reopening must not truncate
        let log = AuditLog::open(&path).unwrap();
        log.record(&AuditEntry::failed(client(), "boom")).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Resultado: 0"));
        assert!(lines[1].ends_with("Error Cuántico desde 203.0.113.9: boom"));
    }

    #[test]
    fn test_concurrent_writers_produce_whole_lines() {
        let dir = TempDir::new().unwrap();
        let log = AuditLog::open(dir.path().join("audit.txt")).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let bit = Bit::from(i % 2 == 1);
                        log.record(&AuditEntry::generated(client(), bit)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 16 * 50);
        for line in lines {
            assert!(
                line.ends_with("| Petición Cuántica desde 203.0.113.9 | Resultado: 0")
                    || line.ends_with("| Petición Cuántica desde 203.0.113.9 | Resultado: 1"),
                "malformed line: {}",
                line
            );
        }
    }
}
