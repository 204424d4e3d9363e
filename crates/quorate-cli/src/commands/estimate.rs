use miette::{IntoDiagnostic, WrapErr};
use quorate_prob::{estimate_samples_with, Precision};

use crate::cli::OutputFormat;

pub(crate) fn run_estimate(
    population: u64,
    successes: u64,
    threshold: f64,
    precision: Precision,
    format: OutputFormat,
) -> miette::Result<()> {
    let estimate = estimate_samples_with(population, successes, threshold, precision)
        .into_diagnostic()
        .wrap_err("sample-size estimate failed")?;
    match format {
        OutputFormat::Text => println!("{estimate}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&estimate).into_diagnostic()?
        ),
    }
    Ok(())
}
