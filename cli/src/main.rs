//! Toolgate demo tool
//!
//! Activates a license against the Toolgate backend, then "processes" one
//! line of input per licensed API call.
//!
//! Usage:
//!   toolgate --api-url https://licenses.example.com

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use toolgate_cli::run_session;
use toolgate_license::{ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, LicenseClient};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "toolgate")]
#[command(about = "Licensed AI tool demo")]
struct Args {
    /// Base URL of the license backend
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Seconds to wait for the backend before giving up
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let config = ClientConfig {
        api_base_url: args.api_url,
        timeout_secs: args.timeout,
    };
    info!("Using license backend {}", config.api_base_url);
    let mut client = LicenseClient::new(config).context("Failed to create license client")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let end = run_session(&mut client, stdin.lock(), &mut stdout).await?;

    info!("Session ended: {:?}", end);
    std::process::exit(end.exit_code());
}
