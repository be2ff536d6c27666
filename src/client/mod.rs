//! Client for a running bit server
//!
//! [`QuantumClient::fetch_bit`] is strict and surfaces every failure.
//! [`QuantumClient::random_bit`] never fails: when the server cannot be
//! reached or answers with something unusable it falls back to a local
//! pseudo-random bit and records that it is disconnected.

use crate::config::ClientConfig;
use crate::constants::http::GENERATE_BIT_PATH;
use crate::error::{Error, Result};
use crate::oracle::{Bit, BitResult};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

/// Number of bits combined by [`QuantumClient::random_float`]
const FLOAT_BITS: u32 = 8;

/// HTTP client for `/generate_bit`
#[derive(Debug)]
pub struct QuantumClient {
    http: reqwest::Client,
    endpoint: String,
    connected: AtomicBool,
}

impl QuantumClient {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:8609`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), GENERATE_BIT_PATH),
            connected: AtomicBool::new(false),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.url, Duration::from_millis(config.timeout_ms))
    }

    /// Full URL of the bit endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether the last call was answered by the server
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Fetch one bit, failing on any transport or protocol problem
    pub async fn fetch_bit(&self) -> Result<BitResult> {
        let result = self.request().await;
        self.connected.store(result.is_ok(), Ordering::Relaxed);
        result
    }

    async fn request(&self) -> Result<BitResult> {
        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Request to {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "Server returned {}: {}",
                status,
                body.trim()
            )));
        }

        let result: BitResult = response.json().await?;
        if !result.success {
            return Err(Error::Transport("Server reported failure".to_string()));
        }
        Ok(result)
    }

    /// One bit from the server, or a local pseudo-random bit if that fails
    pub async fn random_bit(&self) -> Bit {
        match self.fetch_bit().await {
            Ok(result) => result.value,
            Err(e) => {
                debug!("Falling back to local bit: {}", e);
                Bit::from(rand::thread_rng().gen::<bool>())
            }
        }
    }

    /// Float in [0.0, 1.0) assembled from 8 bits, most significant first
    pub async fn random_float(&self) -> f64 {
        let mut value = 0u32;
        for _ in 0..FLOAT_BITS {
            value = (value << 1) | self.random_bit().await.as_u8() as u32;
        }
        value as f64 / (1u32 << FLOAT_BITS) as f64
    }
}
