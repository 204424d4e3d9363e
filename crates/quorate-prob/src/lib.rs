pub mod election;
pub mod hypergeometric;
pub mod sample_size;
pub mod sweep;

pub use election::{elect_committee, empirical_hit_rate, ElectionError, MAX_ELECTION_POPULATION};
pub use hypergeometric::HypergeometricParams;
pub use sample_size::{
    estimate_samples, estimate_samples_with, Precision, SampleSizeError, SampleSizeEstimate,
};
pub use sweep::{
    run_sweep, threshold_label, FaultSweep, Series, SweepError, SweepPoint, SweepReport,
    DEFAULT_THRESHOLDS,
};
