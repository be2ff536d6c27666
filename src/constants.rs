//! Centralized constants for the qbit-server crate
//!
//! Wire-level strings shared by the server, the client and the tests.

/// HTTP surface
pub mod http {
    /// The only routed path
    pub const GENERATE_BIT_PATH: &str = "/generate_bit";

    /// Body served for every path other than [`GENERATE_BIT_PATH`]
    pub const INFO_TEXT: &str =
        "Servidor Cuántico Ejecutándose. Usa /generate_bit para obtener un bit aleatorio.";
}

/// Provenance tag carried by every generated bit
pub const SOURCE_TAG: &str = "quantum_simulation";

/// Time formats
pub mod time {
    /// `timestamp` field of a bit response
    pub const RESPONSE_FORMAT: &str = "%H:%M:%S";

    /// Prefix of each audit line
    pub const AUDIT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// Simulation limits
pub mod sim {
    /// Upper bound on circuit width (state vector holds 2^n amplitudes)
    pub const MAX_QUBITS: usize = 16;
}
