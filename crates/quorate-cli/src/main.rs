mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        None => commands::sweep::run_sweep_command(&cli.sweep),
        Some(Commands::Estimate {
            population,
            successes,
            threshold,
            precision,
            format,
        }) => commands::estimate::run_estimate(population, successes, threshold, precision, format),
        Some(Commands::Simulate {
            population,
            successes,
            size,
            trials,
            seed,
            format,
        }) => commands::simulate::run_simulate(population, successes, size, trials, &seed, format),
    }
}
