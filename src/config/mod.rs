//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/qbit-server/config.toml
//!
//! The server reads its configuration once at startup; nothing is reloaded
//! while it runs.

pub mod defaults;

use crate::error::{Error, Result};
use crate::qrng::{available_backends, is_available};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Randomness oracle settings
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Remote client settings
    #[serde(default)]
    pub client: ClientConfig,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Audit log file (append-only)
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

/// Randomness oracle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Entropy backend for measurements ("pseudo" or "seeded")
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Seed for the seeded backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Remote client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of a running server
    #[serde(default = "default_client_url")]
    pub url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_client_timeout")]
    pub timeout_ms: u64,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}
fn default_backend() -> String {
    DEFAULT_BACKEND.to_string()
}
fn default_client_url() -> String {
    DEFAULT_CLIENT_URL.to_string()
}
fn default_client_timeout() -> u64 {
    DEFAULT_CLIENT_TIMEOUT_MS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_file: default_log_file(),
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            seed: None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_client_url(),
            timeout_ms: default_client_timeout(),
        }
    }
}

impl ServerConfig {
    /// Get server address as "host:port", bracketing IPv6 hosts
    pub fn addr(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, self.port).to_string(),
            Err(_) => format!("{}:{}", self.host, self.port),
        }
    }
}

impl OracleConfig {
    /// Reject backend names the registry does not know
    pub fn check_backend(name: &str) -> Result<()> {
        if is_available(name) {
            return Ok(());
        }

        let names: Vec<String> = available_backends().into_iter().map(|b| b.name).collect();
        Err(Error::Config(format!(
            "Unknown backend: {} (available: {})",
            name,
            names.join(", ")
        )))
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["server", "log_file"] => Some(self.server.log_file.display().to_string()),

            ["oracle", "backend"] => Some(self.oracle.backend.clone()),
            ["oracle", "seed"] => Some(
                self.oracle
                    .seed
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
            ),

            ["client", "url"] => Some(self.client.url.clone()),
            ["client", "timeout_ms"] => Some(self.client.timeout_ms.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong. An empty
    /// value clears `oracle.seed`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }
            ["server", "log_file"] => {
                self.server.log_file = PathBuf::from(value);
            }

            ["oracle", "backend"] => {
                OracleConfig::check_backend(value)?;
                self.oracle.backend = value.to_string();
            }
            ["oracle", "seed"] => {
                self.oracle.seed = if value.is_empty() {
                    None
                } else {
                    Some(value.parse().map_err(|_| {
                        Error::Config(format!("Invalid seed value: {}", value))
                    })?)
                };
            }

            ["client", "url"] => {
                self.client.url = value.to_string();
            }
            ["client", "timeout_ms"] => {
                self.client.timeout_ms = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "server.host",
            "server.port",
            "server.log_file",
            "oracle.backend",
            "oracle.seed",
            "client.url",
            "client.timeout_ms",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        self.server.addr()
    }
}
