//! Bit command handler
//!
//! Draws bits straight from the oracle, without a server.

use crate::config::{Config, OracleConfig};
use crate::error::Result;
use crate::oracle::{BitResult, QuantumOracle, RandomnessOracle};
use clap::Args;

/// Bit command arguments
#[derive(Args)]
pub struct BitArgs {
    /// Number of bits to draw
    #[arg(long, short = 'n', default_value = "1")]
    pub count: usize,

    /// Print each bit as a JSON response body
    #[arg(long)]
    pub json: bool,

    /// Entropy backend for the measurement
    #[arg(long, short = 'b')]
    pub backend: Option<String>,

    /// Seed for the seeded backend
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Run the bit command
pub async fn run(args: BitArgs) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(backend) = args.backend {
        OracleConfig::check_backend(&backend)?;
        config.oracle.backend = backend;
    }
    if args.seed.is_some() {
        config.oracle.seed = args.seed;
    }

    let oracle = QuantumOracle::from_config(&config.oracle)?;

    if args.json {
        for _ in 0..args.count {
            let result = BitResult::new(oracle.generate_bit()?);
            println!("{}", serde_json::to_string(&result)?);
        }
    } else {
        let bits = (0..args.count)
            .map(|_| oracle.generate_bit().map(|b| b.to_string()))
            .collect::<std::result::Result<String, _>>()?;
        println!("{}", bits);
    }

    Ok(())
}
