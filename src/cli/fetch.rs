//! Fetch command handler
//!
//! Pulls bits from a running server over HTTP.

use crate::client::QuantumClient;
use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Fetch command arguments
#[derive(Args)]
pub struct FetchArgs {
    /// Number of values to fetch
    #[arg(long, short = 'n', default_value = "1")]
    pub count: usize,

    /// Server base URL (defaults to client.url from config)
    #[arg(long)]
    pub url: Option<String>,

    /// Print floats in [0, 1) built from 8 bits each instead of bits
    #[arg(long)]
    pub float: bool,

    /// Fall back to local pseudo-random bits when the server is unreachable
    #[arg(long)]
    pub fallback: bool,
}

/// Run the fetch command
pub async fn run(args: FetchArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = args.url {
        config.client.url = url;
    }

    let client = QuantumClient::from_config(&config.client)?;

    for _ in 0..args.count {
        if args.float {
            println!("{:.8}", client.random_float().await);
        } else if args.fallback {
            println!("{}", client.random_bit().await);
        } else {
            println!("{}", client.fetch_bit().await?.value);
        }
    }

    if (args.float || args.fallback) && !client.is_connected() {
        eprintln!("Warning: {} unreachable, values are local pseudo-random", client.endpoint());
    }

    Ok(())
}
