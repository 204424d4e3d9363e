use num::rational::BigRational;
use num::traits::{One, Zero};
use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use crate::hypergeometric::{self, miss_factor};

#[derive(Debug, Error)]
pub enum SampleSizeError {
    #[error("Population must be at least 1, got {0}")]
    InvalidPopulation(u64),
    #[error("Success count K={successes} exceeds population N={population}")]
    InvalidSuccesses { population: u64, successes: u64 },
    #[error("Probability threshold must lie in (0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error(
        "No sample size within the population reaches p={threshold} \
         (population N={population}, successes K={successes})"
    )]
    Unsatisfiable {
        population: u64,
        successes: u64,
        threshold: f64,
    },
}

/// How the zero-success probability is accumulated and compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Exact rational product, compared against the exact value of `p`.
    #[default]
    Exact,
    /// `f64` product, compared as `1 - P(X=0) >= p`.
    Float,
}

impl Precision {
    pub fn as_str(self) -> &'static str {
        match self {
            Precision::Exact => "exact",
            Precision::Float => "float",
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Precision::Exact),
            "float" => Ok(Precision::Float),
            other => Err(format!("unknown precision '{other}' (expected exact|float)")),
        }
    }
}

/// Result of a sample-size search.
#[derive(Debug, Clone, Serialize)]
pub struct SampleSizeEstimate {
    /// Population size N.
    pub population: u64,
    /// Success states K.
    pub successes: u64,
    /// Requested probability of at least one success.
    pub threshold: f64,
    /// Smallest draw count meeting the threshold.
    pub draws: u64,
    /// P(X = 0) at `draws`.
    pub miss_probability: f64,
    /// P(X >= 1) at `draws`.
    pub hit_probability: f64,
    /// Arithmetic used for the search.
    pub precision: Precision,
}

impl SampleSizeEstimate {
    /// Draw count that contains a success regardless of luck, `N - K + 1`.
    pub fn deterministic_bound(&self) -> u64 {
        self.population - self.successes + 1
    }
}

impl std::fmt::Display for SampleSizeEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Population: {} ({} success states)",
            self.population, self.successes
        )?;
        writeln!(f, "  Threshold: p >= {}", self.threshold)?;
        writeln!(
            f,
            "  Sample size: {} (deterministic bound {})",
            self.draws,
            self.deterministic_bound()
        )?;
        writeln!(f, "  P[no success]: {:.3e}", self.miss_probability)?;
        write!(
            f,
            "  P[at least one]: {} ({} arithmetic)",
            self.hit_probability, self.precision
        )
    }
}

/// Smallest number of draws without replacement from a population of
/// `population`, `successes` of which are successes, such that at least one
/// success is drawn with probability `>= threshold`.
pub fn estimate_samples(
    population: u64,
    successes: u64,
    threshold: f64,
) -> Result<u64, SampleSizeError> {
    estimate_samples_with(population, successes, threshold, Precision::default())
        .map(|estimate| estimate.draws)
}

/// [`estimate_samples`] with an explicit [`Precision`], returning the full
/// estimate.
///
/// The search starts at one draw and stops at `population`. K = 0 is
/// rejected before searching.
pub fn estimate_samples_with(
    population: u64,
    successes: u64,
    threshold: f64,
    precision: Precision,
) -> Result<SampleSizeEstimate, SampleSizeError> {
    validate(population, successes, threshold)?;

    if successes == 0 {
        return Err(SampleSizeError::Unsatisfiable {
            population,
            successes,
            threshold,
        });
    }

    let found = match precision {
        Precision::Exact => search_exact(population, successes, threshold),
        Precision::Float => search_float(population, successes, threshold),
    };

    let (draws, miss) = found.ok_or(SampleSizeError::Unsatisfiable {
        population,
        successes,
        threshold,
    })?;

    Ok(SampleSizeEstimate {
        population,
        successes,
        threshold,
        draws,
        miss_probability: miss,
        hit_probability: 1.0 - miss,
        precision,
    })
}

fn validate(population: u64, successes: u64, threshold: f64) -> Result<(), SampleSizeError> {
    if population == 0 {
        return Err(SampleSizeError::InvalidPopulation(population));
    }
    if successes > population {
        return Err(SampleSizeError::InvalidSuccesses {
            population,
            successes,
        });
    }
    if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
        return Err(SampleSizeError::InvalidThreshold(threshold));
    }
    Ok(())
}

fn search_exact(population: u64, successes: u64, threshold: f64) -> Option<(u64, f64)> {
    // p is an f64, so its exact binary value is always representable.
    let target = BigRational::from_float(threshold)?;
    let one = BigRational::one();
    let mut miss = BigRational::one();

    for draws in 1..=population {
        miss *= miss_factor(population, successes, draws);
        let hit = &one - &miss;
        trace!(draws, hit = hypergeometric::to_f64(&hit), "exact search step");
        if hit >= target {
            return Some((draws, hypergeometric::to_f64(&miss)));
        }
        if miss.is_zero() {
            break;
        }
    }
    None
}

fn search_float(population: u64, successes: u64, threshold: f64) -> Option<(u64, f64)> {
    let failures = (population - successes) as f64;
    let total = population as f64;
    let mut miss = 1.0f64;

    for draws in 1..=population {
        let offset = (draws - 1) as f64;
        miss *= ((failures - offset) / (total - offset)).max(0.0);
        let hit = 1.0 - miss;
        trace!(draws, hit, "float search step");
        if hit >= threshold {
            return Some((draws, miss));
        }
    }
    None
}
