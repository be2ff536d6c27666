//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod bit;
pub mod config;
pub mod fetch;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Quantum random bit server
#[derive(Parser)]
#[command(name = "qbit-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the bit server (foreground)
    Serve(serve::ServeArgs),

    /// Draw bits locally from the oracle
    Bit(bit::BitArgs),

    /// Fetch bits from a running server
    Fetch(fetch::FetchArgs),

    /// Show oracle bit quality and server status
    Status(status::StatusArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Bit(args) => bit::run(args).await,
        Commands::Fetch(args) => fetch::run(args).await,
        Commands::Status(args) => status::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Install the console subscriber
///
/// Defaults to `info`; hyper's connection-level chatter is kept at `warn`.
pub(crate) fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
