//! Randomness oracle
//!
//! The oracle is the service's only source of entropy: one call, one bit.
//! [`quantum::QuantumOracle`] is the production implementation; tests swap in
//! doubles through the [`RandomnessOracle`] trait.

pub mod quantum;

use crate::constants::{time::RESPONSE_FORMAT, SOURCE_TAG};
use crate::error::OracleError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use quantum::QuantumOracle;

/// Produces independent random bits
///
/// Implementations are shared across request handlers, so they must be
/// Send + Sync and must not carry state from one draw to the next.
pub trait RandomnessOracle: Send + Sync {
    /// Short name of the generation method
    fn name(&self) -> &'static str;

    /// Draw one bit
    fn generate_bit(&self) -> Result<Bit, OracleError>;
}

/// A single measured bit
///
/// Serialized as the integer 0 or 1; any other integer fails to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    pub fn as_u8(self) -> u8 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

impl From<Bit> for u8 {
    fn from(bit: Bit) -> u8 {
        bit.as_u8()
    }
}

impl From<bool> for Bit {
    fn from(b: bool) -> Bit {
        if b {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

impl TryFrom<u8> for Bit {
    type Error = OracleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Bit::Zero),
            1 => Ok(Bit::One),
            other => Err(OracleError::Decode(format!("{} is not a bit", other))),
        }
    }
}

impl FromStr for Bit {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Bit::Zero),
            "1" => Ok(Bit::One),
            other => Err(OracleError::Decode(format!("{:?} is not a bit", other))),
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Body of a successful `/generate_bit` response
///
/// Example: `{"success":true,"value":1,"source":"quantum_simulation","timestamp":"14:03:59"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitResult {
    pub success: bool,
    pub value: Bit,
    pub source: String,
    /// Wall-clock time, `HH:MM:SS`
    pub timestamp: String,
}

impl BitResult {
    /// Wrap a freshly drawn bit, stamped with the current local time
    pub fn new(value: Bit) -> Self {
        Self::at(value, Local::now())
    }

    pub fn at(value: Bit, time: DateTime<Local>) -> Self {
        Self {
            success: true,
            value,
            source: SOURCE_TAG.to_string(),
            timestamp: time.format(RESPONSE_FORMAT).to_string(),
        }
    }
}
