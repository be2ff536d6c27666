//! Minimal quantum circuit model
//!
//! A circuit is a list of gates and measurements over `num_qubits` qubits and
//! `num_clbits` classical bits. Qubit `q` maps to bit `q` of a state-vector
//! index; classical bit 0 is the rightmost character of a memory string.
//!
//! ```rust
//! use qbit_server::quantum::Circuit;
//!
//! let mut circuit = Circuit::new(1, 1).unwrap();
//! circuit.h(0).unwrap().measure(0, 0).unwrap();
//! assert_eq!(circuit.ops().len(), 2);
//! ```

pub mod simulator;

use crate::constants::sim::MAX_QUBITS;
use crate::error::OracleError;
use std::ops::{Add, Mul, Neg, Sub};

pub use simulator::{RunResult, Simulator};

/// Complex probability amplitude
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Amplitude {
    pub re: f64,
    pub im: f64,
}

impl Amplitude {
    pub const ZERO: Amplitude = Amplitude { re: 0.0, im: 0.0 };
    pub const ONE: Amplitude = Amplitude { re: 1.0, im: 0.0 };

    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// |a|², the probability weight of this amplitude
    pub fn norm_sqr(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

impl Add for Amplitude {
    type Output = Amplitude;
    fn add(self, rhs: Amplitude) -> Amplitude {
        Amplitude::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Amplitude {
    type Output = Amplitude;
    fn sub(self, rhs: Amplitude) -> Amplitude {
        Amplitude::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul<f64> for Amplitude {
    type Output = Amplitude;
    fn mul(self, rhs: f64) -> Amplitude {
        Amplitude::new(self.re * rhs, self.im * rhs)
    }
}

impl Neg for Amplitude {
    type Output = Amplitude;
    fn neg(self) -> Amplitude {
        Amplitude::new(-self.re, -self.im)
    }
}

/// Supported gates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Hadamard: |0⟩ → (|0⟩ + |1⟩)/√2
    H(usize),
    /// Pauli-X (bit flip)
    X(usize),
    /// Pauli-Z (phase flip)
    Z(usize),
    /// Controlled NOT
    CX { control: usize, target: usize },
}

/// One step of a circuit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Gate(Gate),
    Measure { qubit: usize, clbit: usize },
}

/// Quantum circuit
#[derive(Debug, Clone)]
pub struct Circuit {
    num_qubits: usize,
    num_clbits: usize,
    ops: Vec<Op>,
}

impl Circuit {
    /// Create an empty circuit
    ///
    /// Needs at least one qubit and at most `MAX_QUBITS`.
    pub fn new(num_qubits: usize, num_clbits: usize) -> Result<Self, OracleError> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(OracleError::Circuit(format!(
                "qubit count must be between 1 and {}, got {}",
                MAX_QUBITS, num_qubits
            )));
        }
        Ok(Self {
            num_qubits,
            num_clbits,
            ops: Vec::new(),
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn h(&mut self, qubit: usize) -> Result<&mut Self, OracleError> {
        self.push_gate(Gate::H(qubit))
    }

    pub fn x(&mut self, qubit: usize) -> Result<&mut Self, OracleError> {
        self.push_gate(Gate::X(qubit))
    }

    pub fn z(&mut self, qubit: usize) -> Result<&mut Self, OracleError> {
        self.push_gate(Gate::Z(qubit))
    }

    pub fn cx(&mut self, control: usize, target: usize) -> Result<&mut Self, OracleError> {
        if control == target {
            return Err(OracleError::Circuit(format!(
                "cx control and target must differ (both {})",
                control
            )));
        }
        self.push_gate(Gate::CX { control, target })
    }

    /// Measure `qubit` into classical bit `clbit`
    pub fn measure(&mut self, qubit: usize, clbit: usize) -> Result<&mut Self, OracleError> {
        self.check_qubit(qubit)?;
        if clbit >= self.num_clbits {
            return Err(OracleError::Circuit(format!(
                "classical bit {} out of range (circuit has {})",
                clbit, self.num_clbits
            )));
        }
        self.ops.push(Op::Measure { qubit, clbit });
        Ok(self)
    }

    fn push_gate(&mut self, gate: Gate) -> Result<&mut Self, OracleError> {
        match gate {
            Gate::H(q) | Gate::X(q) | Gate::Z(q) => self.check_qubit(q)?,
            Gate::CX { control, target } => {
                self.check_qubit(control)?;
                self.check_qubit(target)?;
            }
        }
        self.ops.push(Op::Gate(gate));
        Ok(self)
    }

    fn check_qubit(&self, qubit: usize) -> Result<(), OracleError> {
        if qubit >= self.num_qubits {
            return Err(OracleError::Circuit(format!(
                "qubit {} out of range (circuit has {})",
                qubit, self.num_qubits
            )));
        }
        Ok(())
    }
}
