use anyhow::Result;
use clap::Parser;
use colored::*;
use sitegrade::cli::Cli;
use sitegrade::{resolve_args, run_resolved};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, args) = match resolve_args(&Cli::parse()) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("{} {}", "Error:".bright_red().bold(), e);
            std::process::exit(1);
        }
    };

    let default_level = if args.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run_resolved(&config, args).await {
        eprintln!("{} {}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
