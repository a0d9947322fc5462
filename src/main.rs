mod classifier;
mod cli;
mod engine;
mod model;
mod orchestrator;
mod reclaim;
mod reporter;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr via RUST_LOG; user-facing progress goes
    // through the reporter.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Cli::parse();
    let outcome = cli::run(args).await?;
    std::process::exit(outcome.exit_code());
}
