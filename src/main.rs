//! qbit-server CLI entry point
//!
//! Quantum random bit server - HTTP service + CLI

use qbit_server::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
