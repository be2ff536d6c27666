//! Serve command handler
//!
//! Starts the HTTP server in foreground mode.

use crate::config::Config;
use crate::error::Result;
use crate::server;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Audit log file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    super::init_logging("info,hyper=warn");

    let mut config = Config::load()?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(log_file) = args.log_file {
        config.server.log_file = log_file;
    }

    info!(
        "Starting qbit-server v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.server_addr()
    );

    // Startup failures reach the console through main, never the audit file
    server::run(config).await
}
