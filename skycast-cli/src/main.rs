//! Binary crate for the `skycast` command-line shell.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and the search loop
//! - Human-friendly output formatting

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
