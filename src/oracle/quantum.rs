//! Quantum coin-flip oracle
//!
//! One qubit starts in |0⟩, a Hadamard gate puts it into an equal
//! superposition and a single-shot measurement collapses it to 0 or 1.

use crate::config::OracleConfig;
use crate::constants::SOURCE_TAG;
use crate::error::OracleError;
use crate::oracle::{Bit, RandomnessOracle};
use crate::qrng::get_backend;
use crate::quantum::{Circuit, Simulator};

/// Oracle backed by the state-vector simulator
///
/// The circuit is built once; every call runs it for exactly one shot.
pub struct QuantumOracle {
    simulator: Simulator,
    circuit: Circuit,
}

impl QuantumOracle {
    pub fn new(simulator: Simulator) -> Result<Self, OracleError> {
        let mut circuit = Circuit::new(1, 1)?;
        circuit.h(0)?.measure(0, 0)?;
        Ok(Self { simulator, circuit })
    }

    /// Build the oracle with the entropy backend named in config
    pub fn from_config(config: &OracleConfig) -> Result<Self, OracleError> {
        let backend = get_backend(&config.backend, config.seed);
        Self::new(Simulator::new(backend))
    }

    /// Entropy backend driving the measurement
    pub fn backend_name(&self) -> &'static str {
        self.simulator.backend_name()
    }
}

impl RandomnessOracle for QuantumOracle {
    fn name(&self) -> &'static str {
        SOURCE_TAG
    }

    fn generate_bit(&self) -> Result<Bit, OracleError> {
        let result = self.simulator.run(&self.circuit, 1)?;
        decode_single_shot(&result.memory)
    }
}

/// Turn the memory of a one-shot, one-clbit run into a bit
fn decode_single_shot(memory: &[String]) -> Result<Bit, OracleError> {
    match memory {
        [shot] => shot.parse(),
        _ => Err(OracleError::Decode(format!(
            "expected exactly one shot, got {}",
            memory.len()
        ))),
    }
}
