//! End-to-end study driver: grid → simulate → fit → summarize.
//!
//! Purpose
//! -------
//! Run the whole experiment from one validated [`StudyConfig`]: build the
//! scenario grid, draw and fit every replicate, and collapse the outcomes
//! into [`ResultRow`]s plus a failed-fit count.
//!
//! Key behaviors
//! -------------
//! - Each replicate is drawn, fitted, and dropped inside one parallel
//!   task; raw count series are never materialized study-wide.
//! - Fit failures stay inside [`fit_trend`]'s tagged outcome and surface
//!   only as the `failed_fits` tally; simulation errors (unreachable with
//!   a validated config) abort the run as [`crate::errors::StudyError`]s.
//! - Row order is deterministic for a fixed seed: grid order, then
//!   replicate index within each scenario.
use rayon::prelude::*;

use crate::{
    config::StudyConfig,
    errors::StudyResult,
    results::{self, ResultRow},
    scenario::{self, Scenario},
    simulate::{replicate_rng, simulate_counts},
    trend::{fit_trend, TrendFit},
};

/// Everything a completed study produces.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyOutcome {
    /// One row per converged fit, in grid-then-replicate order.
    pub rows: Vec<ResultRow>,
    /// Replicates whose fit failed and were excluded from `rows`.
    pub failed_fits: usize,
}

/// Run the full simulation study described by `config`.
///
/// # Errors
/// Configuration errors from [`StudyConfig::validate`], or a simulation
/// error if a per-period mean leaves the sampler's domain.
pub fn run_study(config: &StudyConfig) -> StudyResult<StudyOutcome> {
    config.validate()?;
    let grid = scenario::build_grid(config);
    let fits: Vec<(Scenario, TrendFit)> = grid
        .par_iter()
        .enumerate()
        .flat_map(|(scenario_idx, scenario)| {
            (0..config.replicates).into_par_iter().map(move |replicate_idx| {
                let mut rng = replicate_rng(config.seed, scenario_idx, replicate_idx);
                let counts = simulate_counts(
                    scenario.duration,
                    scenario.annual_rate,
                    config.baseline_rate,
                    &mut rng,
                )?;
                Ok((*scenario, fit_trend(&counts, &config.fit_opts)))
            })
        })
        .collect::<StudyResult<Vec<_>>>()?;
    let (rows, failed_fits) = results::summarize(&fits, config.horizon);
    Ok(StudyOutcome { rows, failed_fits })
}
