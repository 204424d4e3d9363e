use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::sample_size::{estimate_samples_with, Precision, SampleSizeError};

/// `1 - 10^-15`.
pub const THRESHOLD_QUADRILLION: f64 = 0.999999999999999;
/// `1 - 10^-12`.
pub const THRESHOLD_TRILLION: f64 = 0.999999999999;
/// Thresholds plotted by default, strictest first.
pub const DEFAULT_THRESHOLDS: [f64; 2] = [THRESHOLD_QUADRILLION, THRESHOLD_TRILLION];

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Invalid fault sweep: start={start}, step={step}, end={end}")]
    InvalidRange { start: u64, step: u64, end: u64 },
    #[error("No probability thresholds given")]
    NoThresholds,
    #[error("Sample size for f={faults} at p={threshold}: {source}")]
    Estimate {
        faults: u64,
        threshold: f64,
        #[source]
        source: SampleSizeError,
    },
}

/// Inclusive range of fault counts, `start, start+step, ..., <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaultSweep {
    pub start: u64,
    pub step: u64,
    pub end: u64,
}

impl Default for FaultSweep {
    fn default() -> Self {
        Self {
            start: 1,
            step: 5,
            end: 496,
        }
    }
}

impl FaultSweep {
    pub fn new(start: u64, step: u64, end: u64) -> Result<Self, SweepError> {
        let sweep = Self { start, step, end };
        sweep.validate()?;
        Ok(sweep)
    }

    fn validate(&self) -> Result<(), SweepError> {
        if self.step == 0 || self.start > self.end {
            return Err(SweepError::InvalidRange {
                start: self.start,
                step: self.step,
                end: self.end,
            });
        }
        Ok(())
    }

    /// The fault counts in order.
    pub fn fault_counts(&self) -> Vec<u64> {
        if self.step == 0 || self.start > self.end {
            return Vec::new();
        }
        (self.start..=self.end).step_by(self.step as usize).collect()
    }

    pub fn points(&self) -> impl Iterator<Item = SweepPoint> {
        self.fault_counts().into_iter().map(SweepPoint::from_faults)
    }
}

/// The scenario derived from one fault count under `N = 3f + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepPoint {
    pub faults: u64,
    pub population: u64,
    pub successes: u64,
}

impl SweepPoint {
    pub fn from_faults(faults: u64) -> Self {
        Self {
            faults,
            population: 3 * faults + 1,
            successes: faults + 1,
        }
    }

    /// Committee size that always includes one of the `f + 1` nodes: `2f + 1`.
    pub fn deterministic_bound(&self) -> u64 {
        self.population - self.successes + 1
    }
}

/// Sample sizes for one threshold, aligned with [`SweepReport::faults`].
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub threshold: f64,
    pub label: String,
    pub sizes: Vec<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub precision: Precision,
    pub faults: Vec<u64>,
    pub populations: Vec<u64>,
    pub deterministic_bounds: Vec<u64>,
    pub series: Vec<Series>,
}

impl SweepReport {
    /// Series for the least strict threshold.
    pub fn lowest_confidence(&self) -> Option<&Series> {
        self.series
            .iter()
            .min_by(|a, b| a.threshold.total_cmp(&b.threshold))
    }
}

/// Estimate the sample size for every fault count and threshold.
///
/// Fails on the first estimate that cannot be produced; no partial report is
/// returned.
pub fn run_sweep(
    sweep: &FaultSweep,
    thresholds: &[f64],
    precision: Precision,
) -> Result<SweepReport, SweepError> {
    sweep.validate()?;
    if thresholds.is_empty() {
        return Err(SweepError::NoThresholds);
    }

    let points: Vec<SweepPoint> = sweep.points().collect();
    let mut series: Vec<Series> = thresholds
        .iter()
        .map(|&threshold| Series {
            threshold,
            label: threshold_label(threshold),
            sizes: Vec::with_capacity(points.len()),
        })
        .collect();

    for point in &points {
        for s in series.iter_mut() {
            let estimate =
                estimate_samples_with(point.population, point.successes, s.threshold, precision)
                    .map_err(|source| SweepError::Estimate {
                        faults: point.faults,
                        threshold: s.threshold,
                        source,
                    })?;
            s.sizes.push(estimate.draws);
        }
        debug!(
            faults = point.faults,
            population = point.population,
            sizes = ?series.iter().filter_map(|s| s.sizes.last()).collect::<Vec<_>>(),
            "sweep point done"
        );
    }

    info!(
        points = points.len(),
        thresholds = series.len(),
        %precision,
        "sweep complete"
    );

    Ok(SweepReport {
        precision,
        faults: points.iter().map(|p| p.faults).collect(),
        populations: points.iter().map(|p| p.population).collect(),
        deterministic_bounds: points.iter().map(SweepPoint::deterministic_bound).collect(),
        series,
    })
}

/// Legend label for a threshold: `p = 1-10^-k` when `1 - p` is a power of
/// ten, the plain value otherwise.
pub fn threshold_label(threshold: f64) -> String {
    let complement = 1.0 - threshold;
    if complement > 0.0 && complement < 1.0 {
        let exponent = complement.log10();
        let rounded = exponent.round();
        if (exponent - rounded).abs() < 1e-3 {
            return format!("p = 1-10^{}", rounded as i64);
        }
    }
    format!("p = {threshold}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sweep_has_one_hundred_points() {
        let faults = FaultSweep::default().fault_counts();
        assert_eq!(faults.len(), 100);
        assert_eq!(faults[0], 1);
        assert_eq!(faults[1], 6);
        assert_eq!(*faults.last().unwrap(), 496);
    }

    #[test]
    fn point_derivation() {
        let p = SweepPoint::from_faults(6);
        assert_eq!(p.population, 19);
        assert_eq!(p.successes, 7);
        assert_eq!(p.deterministic_bound(), 13);
    }

    #[test]
    fn invalid_ranges_rejected() {
        assert!(FaultSweep::new(1, 0, 10).is_err());
        assert!(FaultSweep::new(10, 1, 5).is_err());
        assert!(FaultSweep::new(3, 2, 3).is_ok());
        let bad = FaultSweep {
            start: 1,
            step: 0,
            end: 3,
        };
        assert!(matches!(
            run_sweep(&bad, &DEFAULT_THRESHOLDS, Precision::Exact),
            Err(SweepError::InvalidRange { .. })
        ));
    }

    #[test]
    fn empty_thresholds_rejected() {
        let sweep = FaultSweep::new(1, 1, 2).unwrap();
        assert!(matches!(
            run_sweep(&sweep, &[], Precision::Exact),
            Err(SweepError::NoThresholds)
        ));
    }

    #[test]
    fn default_sweep_is_aligned() {
        let report =
            run_sweep(&FaultSweep::default(), &DEFAULT_THRESHOLDS, Precision::Exact).unwrap();
        assert_eq!(report.faults.len(), 100);
        assert_eq!(report.populations.len(), 100);
        assert_eq!(report.series.len(), 2);
        for (i, f) in report.faults.iter().enumerate() {
            assert_eq!(*f, 1 + 5 * i as u64);
            assert_eq!(report.populations[i], 3 * f + 1);
        }
        for s in &report.series {
            assert_eq!(s.sizes.len(), 100);
            // f=1 (N=4, K=2) and f=6 (N=19, K=7) are both saturated.
            assert_eq!(s.sizes[0], 3);
            assert_eq!(s.sizes[1], 13);
            for (size, bound) in s.sizes.iter().zip(&report.deterministic_bounds) {
                assert!(size <= bound);
            }
        }
        let strict = &report.series[0];
        let lax = &report.series[1];
        for (a, b) in strict.sizes.iter().zip(&lax.sizes) {
            assert!(a >= b);
        }
        assert_eq!(report.lowest_confidence().unwrap().threshold, THRESHOLD_TRILLION);
    }

    #[test]
    fn precision_modes_agree_within_one_draw() {
        let sweep = FaultSweep::default();
        let exact = run_sweep(&sweep, &DEFAULT_THRESHOLDS, Precision::Exact).unwrap();
        let float = run_sweep(&sweep, &DEFAULT_THRESHOLDS, Precision::Float).unwrap();
        for (e, f) in exact.series.iter().zip(&float.series) {
            for (a, b) in e.sizes.iter().zip(&f.sizes) {
                assert!(a.abs_diff(*b) <= 1, "exact={a} float={b}");
            }
        }
    }

    #[test]
    fn sweep_error_carries_fault_count() {
        let sweep = FaultSweep::new(1, 1, 3).unwrap();
        let err = run_sweep(&sweep, &[0.9, 2.0], Precision::Exact).unwrap_err();
        match err {
            SweepError::Estimate {
                faults, threshold, ..
            } => {
                assert_eq!(faults, 1);
                assert_eq!(threshold, 2.0);
            }
            other => panic!("expected Estimate error, got {other}"),
        }
    }

    #[test]
    fn labels_use_power_of_ten() {
        assert_eq!(threshold_label(THRESHOLD_QUADRILLION), "p = 1-10^-15");
        assert_eq!(threshold_label(THRESHOLD_TRILLION), "p = 1-10^-12");
        assert_eq!(threshold_label(0.9), "p = 1-10^-1");
        assert_eq!(threshold_label(0.75), "p = 0.75");
        assert_eq!(threshold_label(1.0), "p = 1");
    }
}
