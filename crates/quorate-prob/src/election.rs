//! Seeded committee election.
//!
//! A committee is drawn without replacement from node ids `0..population`
//! using a ChaCha20 stream keyed by the SHA-256 of a seed. Nodes
//! `0..successes` form the designated subset when estimating hit rates.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ElectionError {
    #[error("Committee size {size} exceeds population {population}")]
    CommitteeTooLarge { population: u64, size: u64 },
    #[error("Designated subset K={successes} exceeds population {population}")]
    SubsetTooLarge { population: u64, successes: u64 },
    #[error("Population {population} exceeds the election limit of {max} nodes")]
    PopulationTooLarge { population: u64, max: u64 },
    #[error("At least one trial is required")]
    NoTrials,
}

/// Largest population an election will materialise as a candidate list.
pub const MAX_ELECTION_POPULATION: u64 = 1 << 20;

fn check_population(population: u64) -> Result<(), ElectionError> {
    if population > MAX_ELECTION_POPULATION {
        return Err(ElectionError::PopulationTooLarge {
            population,
            max: MAX_ELECTION_POPULATION,
        });
    }
    Ok(())
}

fn rng_from_seed(seed: &[u8]) -> ChaCha20Rng {
    let digest: [u8; 32] = Sha256::digest(seed).into();
    ChaCha20Rng::from_seed(digest)
}

/// Elect `size` distinct nodes out of `0..population`, returned sorted.
///
/// Identical seeds always elect identical committees. Each draw takes
/// `next_u64 % remaining` as an index into the remaining candidates, which
/// keep their ascending order.
pub fn elect_committee(population: u64, size: u64, seed: &[u8]) -> Result<Vec<u64>, ElectionError> {
    check_population(population)?;
    if size > population {
        return Err(ElectionError::CommitteeTooLarge { population, size });
    }
    let mut candidates = Vec::with_capacity(population as usize);
    Ok(elect_into(&mut candidates, population, size, seed))
}

fn elect_into(candidates: &mut Vec<u64>, population: u64, size: u64, seed: &[u8]) -> Vec<u64> {
    let mut rng = rng_from_seed(seed);
    candidates.clear();
    candidates.extend(0..population);
    let mut committee = Vec::with_capacity(size as usize);
    for _ in 0..size {
        let idx = (rng.next_u64() % candidates.len() as u64) as usize;
        committee.push(candidates.remove(idx));
    }
    committee.sort_unstable();
    committee
}

/// Fraction of `trials` elected committees that contain at least one node
/// from `0..successes`.
pub fn empirical_hit_rate(
    population: u64,
    successes: u64,
    size: u64,
    trials: u64,
    seed: &str,
) -> Result<f64, ElectionError> {
    check_population(population)?;
    if size > population {
        return Err(ElectionError::CommitteeTooLarge { population, size });
    }
    if successes > population {
        return Err(ElectionError::SubsetTooLarge {
            population,
            successes,
        });
    }
    if trials == 0 {
        return Err(ElectionError::NoTrials);
    }
    let mut candidates = Vec::with_capacity(population as usize);
    let mut hits = 0u64;
    for trial in 0..trials {
        let committee = elect_into(
            &mut candidates,
            population,
            size,
            format!("{seed}:{trial}").as_bytes(),
        );
        // Sorted, so the smallest id decides membership.
        if committee.first().is_some_and(|&id| id < successes) {
            hits += 1;
        }
    }
    let rate = hits as f64 / trials as f64;
    debug!(population, successes, size, trials, hits, rate, "election trials done");
    Ok(rate)
}
