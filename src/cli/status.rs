//! Status command handler
//!
//! Shows oracle bit quality and, optionally, whether a server answers.

use crate::client::QuantumClient;
use crate::config::Config;
use crate::entropy::run_all_tests;
use crate::error::Result;
use crate::oracle::{QuantumOracle, RandomnessOracle};
use crate::qrng::available_backends;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Run bit quality tests over N draws
    #[arg(long, default_value = "10000")]
    pub bits: usize,

    /// Check if the configured server is running
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    if args.server {
        check_server_status(&config).await;
    }

    let oracle = QuantumOracle::from_config(&config.oracle)?;

    println!("qbit-server v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Oracle: {} (entropy backend: {})", oracle.name(), oracle.backend_name());
    println!();

    println!("Entropy backends:");
    for info in available_backends() {
        let marker = if info.name == oracle.backend_name() { "*" } else { " " };
        println!("  {} {:<8} {}", marker, info.name, info.description);
    }
    println!();

    println!("Bit Quality Test ({} draws):", args.bits);
    let bits = (0..args.bits)
        .map(|_| oracle.generate_bit())
        .collect::<std::result::Result<Vec<_>, _>>();

    match bits {
        Ok(bits) => {
            let results = run_all_tests(&bits);

            let status = |score: f64| {
                if score >= 0.1 {
                    "PASS"
                } else if score >= 0.01 {
                    "MARGINAL"
                } else {
                    "FAIL"
                }
            };

            println!(
                "  Ones:               {} ({:.4})",
                results.ones, results.fraction_ones
            );
            println!(
                "  Balanced (monobit): {:.4} [{}]",
                results.balanced,
                status(results.balanced)
            );
            println!(
                "  Scattered (runs):   {:.4} [{}]",
                results.scattered,
                status(results.scattered)
            );
            println!();
            println!(
                "  Overall: {:.4} [{}]",
                results.overall,
                if results.all_passed() { "PASS" } else { "FAIL" }
            );
        }
        Err(e) => {
            println!("  Error: Oracle failed: {}", e);
        }
    }

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let client = match QuantumClient::from_config(&config.client) {
        Ok(client) => client,
        Err(e) => {
            println!("Server: ERROR ({})", e);
            println!();
            return;
        }
    };

    match client.fetch_bit().await {
        Ok(result) => {
            println!("Server: RUNNING at {}", client.endpoint());
            println!("  Source: {}", result.source);
            println!("  Sample: {} at {}", result.value, result.timestamp);
        }
        Err(e) => {
            println!("Server: NOT RUNNING at {} ({})", client.endpoint(), e);
        }
    }
    println!();
}
