//! Review CLI entry-point: wires configuration, tracing, and the HTTP
//! adapters, then dispatches one command.

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use client::config::ClientConfig;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let parsed = cli::Cli::parse();
    let config = ClientConfig::load()?;
    cli::run(parsed, &config).await
}
