//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Args, Parser, Subcommand, ValueEnum};
use quorate_prob::Precision;
use std::path::PathBuf;

pub(crate) const CLI_LONG_ABOUT: &str =
    "Committee sizing for hypergeometric sampling.\n\n\
    With no subcommand, sweeps f = 1, 6, ..., 496 over populations of 3f+1 nodes\n\
    with f+1 designated nodes, finds the smallest committee that contains a\n\
    designated node with probability p for p = 1-10^-15 and p = 1-10^-12,\n\
    prints the p = 1-10^-12 sizes and plots both curves to\n\
    committee_size_probability.jpg.\n\n\
    Single scenarios:\n  \
    quorate estimate --population 100 --successes 34 --threshold 0.999999\n  \
    quorate simulate --population 100 --successes 34 --size 30";

#[derive(Parser)]
#[command(name = "quorate")]
#[command(about = "Minimum committee sizes under hypergeometric sampling")]
#[command(long_about = CLI_LONG_ABOUT)]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    #[command(flatten)]
    pub(crate) sweep: SweepArgs,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct SweepArgs {
    /// Output image path (JPEG).
    #[arg(long, short, default_value = "committee_size_probability.jpg")]
    pub(crate) output: PathBuf,

    /// Probability threshold; repeat to plot several curves.
    /// Defaults to 1-10^-15 and 1-10^-12.
    #[arg(long = "threshold", value_name = "P")]
    pub(crate) thresholds: Vec<f64>,

    /// First fault count of the sweep.
    #[arg(long, default_value_t = 1)]
    pub(crate) start: u64,

    /// Fault-count increment.
    #[arg(long, default_value_t = 5)]
    pub(crate) step: u64,

    /// Last fault count of the sweep (inclusive).
    #[arg(long, default_value_t = 496)]
    pub(crate) end: u64,

    /// Probability arithmetic: exact | float
    #[arg(long, default_value = "exact")]
    pub(crate) precision: Precision,

    /// Optional JSON report output path.
    #[arg(long)]
    pub(crate) json_report: Option<PathBuf>,

    /// Image width in pixels.
    #[arg(long, default_value_t = 800)]
    pub(crate) width: u32,

    /// Image height in pixels.
    #[arg(long, default_value_t = 600)]
    pub(crate) height: u32,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Smallest sample size for a single scenario.
    Estimate {
        /// Population size N.
        #[arg(long, short = 'n')]
        population: u64,

        /// Success states K in the population.
        #[arg(long, short = 'k')]
        successes: u64,

        /// Required probability of drawing at least one success.
        #[arg(long, short = 'p')]
        threshold: f64,

        /// Probability arithmetic: exact | float
        #[arg(long, default_value = "exact")]
        precision: Precision,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Elect seeded committees and compare the empirical hit rate with the
    /// exact probability.
    Simulate {
        /// Population size N.
        #[arg(long, short = 'n')]
        population: u64,

        /// Designated nodes K (ids 0..K).
        #[arg(long, short = 'k')]
        successes: u64,

        /// Committee size.
        #[arg(long, short = 's')]
        size: u64,

        /// Number of elections.
        #[arg(long, default_value_t = 10_000)]
        trials: u64,

        /// Seed string; trial t uses "<seed>:<t>".
        #[arg(long, default_value = "quorate")]
        seed: String,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}
