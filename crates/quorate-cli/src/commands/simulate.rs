use miette::{IntoDiagnostic, WrapErr};
use quorate_prob::hypergeometric::{self, HypergeometricParams};
use quorate_prob::empirical_hit_rate;
use serde::Serialize;

use crate::cli::OutputFormat;

#[derive(Debug, Serialize)]
pub(crate) struct SimulationReport {
    pub population: u64,
    pub successes: u64,
    pub size: u64,
    pub trials: u64,
    pub seed: String,
    pub empirical_hit_rate: f64,
    pub exact_hit_probability: f64,
}

pub(crate) fn simulate(
    population: u64,
    successes: u64,
    size: u64,
    trials: u64,
    seed: &str,
) -> miette::Result<SimulationReport> {
    let empirical = empirical_hit_rate(population, successes, size, trials, seed)
        .into_diagnostic()
        .wrap_err("committee election failed")?;
    let params = HypergeometricParams::new(population, successes, size).into_diagnostic()?;
    let exact = hypergeometric::to_f64(&hypergeometric::hit_probability(&params));
    Ok(SimulationReport {
        population,
        successes,
        size,
        trials,
        seed: seed.to_string(),
        empirical_hit_rate: empirical,
        exact_hit_probability: exact,
    })
}

pub(crate) fn run_simulate(
    population: u64,
    successes: u64,
    size: u64,
    trials: u64,
    seed: &str,
    format: OutputFormat,
) -> miette::Result<()> {
    let report = simulate(population, successes, size, trials, seed)?;
    match format {
        OutputFormat::Text => {
            println!(
                "Committee of {} from {} ({} designated), {} elections:",
                report.size, report.population, report.successes, report.trials
            );
            println!("  Empirical hit rate: {:.6}", report.empirical_hit_rate);
            println!("  Exact probability:  {:.6}", report.exact_hit_probability);
        }
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).into_diagnostic()?
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_reports_exact_probability() {
        let report = simulate(4, 1, 3, 200, "t").unwrap();
        assert_eq!(report.exact_hit_probability, 0.75);
        assert!((report.empirical_hit_rate - 0.75).abs() < 0.15);
    }

    #[test]
    fn simulation_rejects_oversized_committee() {
        assert!(simulate(4, 1, 5, 10, "t").is_err());
    }

    #[test]
    fn simulation_rejects_huge_population() {
        let err = simulate(1 << 40, 1, 1, 10, "t").unwrap_err();
        assert!(err.chain().any(|e| e.to_string().contains("election limit")));
    }
}
