//! Seeded random streams.
//!
//! The simulator never reaches for process-wide randomness: every draw comes from a generator
//! the caller owns. A sweep or a parallel run needs many independent generators, and those are
//! derived here from a single base seed, either by trial index or by name. A named stream is
//! seeded with `base_seed + hash(name)`, so adding a new stream never perturbs the draws of an
//! existing one.

use log::trace;
use rand::SeedableRng;

use crate::hashing::{hash_str, hash_u64};

/// The generator type used for every trial and stream.
pub type SimRng = rand::rngs::SmallRng;

/// Creates a generator from a `u64` seed.
#[must_use]
pub fn rng_from_seed(seed: u64) -> SimRng {
    SimRng::seed_from_u64(seed)
}

/// Derives the seed of a named stream from the base seed.
#[must_use]
pub fn stream_seed(base_seed: u64, name: &str) -> u64 {
    base_seed.wrapping_add(hash_str(name))
}

/// Derives the seed of the trial with index `trial` from the base seed. Distinct trials
/// get unrelated seeds, so trials can run on any thread in any order.
#[must_use]
pub fn trial_seed(base_seed: u64, trial: usize) -> u64 {
    hash_u64(trial as u64, base_seed)
}

/// Returns the generator for trial `trial` of a run seeded with `base_seed`.
#[must_use]
pub fn trial_rng(base_seed: u64, trial: usize) -> SimRng {
    let seed = trial_seed(base_seed, trial);
    trace!("creating trial RNG (base_seed={base_seed}, trial={trial}, seed={seed})");
    rng_from_seed(seed)
}
