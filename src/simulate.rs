//! Count simulation: Poisson draws under a compounding mean schedule.
//!
//! Purpose
//! -------
//! Generate synthetic event-count series for a scenario and fan the
//! generation out across replicates. Period `t` (1-based) of a series has
//! expected count `λ₀ · (1 + r)^(t−1)`: no compounding at period 1, so the
//! first period's mean is the baseline exactly.
//!
//! Key behaviors
//! -------------
//! - [`mean_for_period`] exposes the mean schedule on its own so the
//!   no-compounding-at-t=1 invariant is directly testable.
//! - [`simulate_counts`] draws one independent Poisson sample per period
//!   through `statrs`' sampler.
//! - [`run_replicates`] produces exactly `replicates` series per scenario
//!   in parallel, each tagged with its owning scenario and replicate index
//!   (no orphans, no cross-assignment).
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration is pre-validated: `baseline > 0` and `rate > -1`, so
//!   every per-period mean is strictly positive and `Poisson::new` only
//!   fails on a programming error upstream (still surfaced as a typed
//!   error, never a panic).
//! - Each replicate owns an independent RNG stream derived from the master
//!   seed by splitmix mixing of (seed, scenario index, replicate index);
//!   parallel execution is therefore reproducible and share-nothing.
use crate::{
    config::StudyConfig,
    errors::{StudyError, StudyResult},
    scenario::Scenario,
};
use rand::{distributions::Distribution, rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use statrs::distribution::Poisson;

/// One simulated count series, tagged with its owning scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct Replicate {
    /// The scenario this series was drawn under.
    pub scenario: Scenario,
    /// Replicate index within the scenario, `0..replicates`.
    pub index: usize,
    /// Event counts, one per period, length == `scenario.duration`.
    pub counts: Vec<u64>,
}

/// Expected count for 1-based period `t`: `baseline · (1 + rate)^(t−1)`.
///
/// Period 1 returns `baseline` exactly (`powi(0) == 1.0`).
pub fn mean_for_period(baseline: f64, rate: f64, t: usize) -> f64 {
    baseline * (1.0 + rate).powi(t as i32 - 1)
}

/// Draw one count series of length `duration` under the compounding schedule.
///
/// Each period is an independent Poisson sample with that period's mean.
///
/// # Errors
/// [`StudyError::InvalidMeanCount`] if a per-period mean falls outside the
/// sampler's domain (possible only with inputs that bypassed validation).
pub fn simulate_counts<R: Rng>(
    duration: usize, rate: f64, baseline: f64, rng: &mut R,
) -> StudyResult<Vec<u64>> {
    let mut counts = Vec::with_capacity(duration);
    for t in 1..=duration {
        let mean = mean_for_period(baseline, rate, t);
        let poisson =
            Poisson::new(mean).map_err(|_| StudyError::InvalidMeanCount { value: mean })?;
        let draw: f64 = poisson.sample(rng);
        counts.push(draw as u64);
    }
    Ok(counts)
}

/// Independent RNG stream for one (scenario, replicate) cell.
///
/// Splitmix mixing keeps streams decorrelated without shared state, so the
/// rayon fan-out needs no locking and reproduces bit-identical draws for a
/// given master seed.
pub fn replicate_rng(seed: u64, scenario_idx: usize, replicate_idx: usize) -> StdRng {
    let cell = ((scenario_idx as u64) << 32) ^ replicate_idx as u64;
    StdRng::seed_from_u64(splitmix64(seed ^ splitmix64(cell)))
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Simulate all replicates for one scenario, in parallel.
///
/// Produces exactly `config.replicates` [`Replicate`]s, each carrying the
/// owning scenario by value and its index within the scenario.
///
/// Note: the end-to-end driver in [`crate::study`] fits each series as soon
/// as it is drawn and drops it, so whole-scenario materialization only
/// happens when a caller wants the raw series (tests, exports).
pub fn run_replicates(
    scenario: Scenario, scenario_idx: usize, config: &StudyConfig,
) -> StudyResult<Vec<Replicate>> {
    (0..config.replicates)
        .into_par_iter()
        .map(|index| {
            let mut rng = replicate_rng(config.seed, scenario_idx, index);
            let counts =
                simulate_counts(scenario.duration, scenario.annual_rate, config.baseline_rate, &mut rng)?;
            Ok(Replicate { scenario, index, counts })
        })
        .collect()
}
