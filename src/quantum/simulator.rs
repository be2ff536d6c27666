//! State-vector simulator
//!
//! Runs a [`Circuit`] shot by shot. Every shot starts from |0…0⟩; measurement
//! outcomes are drawn from the configured [`QrngBackend`].

use super::{Amplitude, Circuit, Gate, Op};
use crate::error::OracleError;
use crate::qrng::QrngBackend;
use std::collections::BTreeMap;
use std::f64::consts::FRAC_1_SQRT_2;
use std::sync::Arc;

/// Tolerance for probability sums drifting away from 1.0
const NORM_EPSILON: f64 = 1e-9;

/// Outcome of a simulation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// One classical-register bitstring per shot, clbit 0 rightmost
    pub memory: Vec<String>,
}

impl RunResult {
    /// Histogram of the per-shot bitstrings
    pub fn counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for shot in &self.memory {
            *counts.entry(shot.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Amplitudes of an n-qubit register
#[derive(Debug, Clone)]
pub struct StateVector {
    amps: Vec<Amplitude>,
}

impl StateVector {
    /// |0…0⟩ over `num_qubits` qubits
    pub fn new(num_qubits: usize) -> Self {
        let mut amps = vec![Amplitude::ZERO; 1 << num_qubits];
        amps[0] = Amplitude::ONE;
        Self { amps }
    }

    pub fn amplitudes(&self) -> &[Amplitude] {
        &self.amps
    }

    pub fn apply(&mut self, gate: Gate) {
        match gate {
            Gate::H(q) => {
                let mask: usize = 1 << q;
                for i in (0..self.amps.len()).filter(|i| i & mask == 0) {
                    let (a, b) = (self.amps[i], self.amps[i | mask]);
                    self.amps[i] = (a + b) * FRAC_1_SQRT_2;
                    self.amps[i | mask] = (a - b) * FRAC_1_SQRT_2;
                }
            }
            Gate::X(q) => {
                let mask: usize = 1 << q;
                for i in (0..self.amps.len()).filter(|i| i & mask == 0) {
                    self.amps.swap(i, i | mask);
                }
            }
            Gate::Z(q) => {
                let mask: usize = 1 << q;
                for amp in self
                    .amps
                    .iter_mut()
                    .enumerate()
                    .filter(|(i, _)| i & mask != 0)
                    .map(|(_, a)| a)
                {
                    *amp = -*amp;
                }
            }
            Gate::CX { control, target } => {
                let (cmask, tmask): (usize, usize) = (1 << control, 1 << target);
                for i in (0..self.amps.len()).filter(|i| i & cmask != 0 && i & tmask == 0) {
                    self.amps.swap(i, i | tmask);
                }
            }
        }
    }

    /// Probability that measuring `qubit` yields 0
    pub fn probability_zero(&self, qubit: usize) -> f64 {
        let mask: usize = 1 << qubit;
        self.amps
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask == 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Project onto `outcome` for `qubit` and renormalize
    fn collapse(&mut self, qubit: usize, outcome: u8) -> Result<(), OracleError> {
        let mask: usize = 1 << qubit;
        let keep = |i: usize| ((i & mask != 0) as u8) == outcome;

        let weight: f64 = self
            .amps
            .iter()
            .enumerate()
            .filter(|(i, _)| keep(*i))
            .map(|(_, a)| a.norm_sqr())
            .sum();
        if !weight.is_finite() || weight <= 0.0 {
            return Err(OracleError::Simulation(format!(
                "measured outcome {} on qubit {} has zero probability",
                outcome, qubit
            )));
        }

        let scale = 1.0 / weight.sqrt();
        for (i, amp) in self.amps.iter_mut().enumerate() {
            *amp = if keep(i) { *amp * scale } else { Amplitude::ZERO };
        }
        Ok(())
    }
}

/// Circuit simulator
///
/// Holds no per-run state, so one instance is shared by all request handlers.
#[derive(Clone)]
pub struct Simulator {
    entropy: Arc<dyn QrngBackend>,
}

impl Simulator {
    pub fn new(entropy: Arc<dyn QrngBackend>) -> Self {
        Self { entropy }
    }

    /// Name of the entropy backend driving measurements
    pub fn backend_name(&self) -> &'static str {
        self.entropy.name()
    }

    /// Run `circuit` for `shots` independent shots
    pub fn run(&self, circuit: &Circuit, shots: usize) -> Result<RunResult, OracleError> {
        if shots == 0 {
            return Err(OracleError::Simulation("shots must be at least 1".to_string()));
        }

        let memory = (0..shots)
            .map(|_| self.run_shot(circuit))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RunResult { memory })
    }

    fn run_shot(&self, circuit: &Circuit) -> Result<String, OracleError> {
        let mut state = StateVector::new(circuit.num_qubits());
        let mut clbits = vec![0u8; circuit.num_clbits()];

        for op in circuit.ops() {
            match *op {
                Op::Gate(gate) => state.apply(gate),
                Op::Measure { qubit, clbit } => {
                    clbits[clbit] = self.measure(&mut state, qubit)?;
                }
            }
        }

        Ok(clbits
            .iter()
            .rev()
            .map(|&b| if b == 1 { '1' } else { '0' })
            .collect())
    }

    fn measure(&self, state: &mut StateVector, qubit: usize) -> Result<u8, OracleError> {
        let p0 = state.probability_zero(qubit);
        if !(-NORM_EPSILON..=1.0 + NORM_EPSILON).contains(&p0) {
            return Err(OracleError::Simulation(format!(
                "probability out of range: {}",
                p0
            )));
        }

        let r = self.entropy.float()?;
        let outcome = if r < p0 { 0 } else { 1 };
        state.collapse(qubit, outcome)?;
        Ok(outcome)
    }
}
