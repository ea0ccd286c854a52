use anyhow::Result;
use clap::Parser;

use cmc_seed::{run, SeedConfig};

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the summary
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let config = SeedConfig::parse();
    let (data, _files) = run(&config)?;

    println!("{}", data.summary());

    Ok(())
}
