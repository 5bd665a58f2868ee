//! Study configuration: the fixed inputs of a drift-detection power study.
//!
//! Purpose
//! -------
//! Bundle every external input of the pipeline — reference horizon,
//! baseline expected count, replicate count, candidate scenario axes, RNG
//! seed, and optimizer options — into a single validated value. Invalid
//! configurations are rejected at construction (the fail-fast tier of the
//! error taxonomy); downstream code assumes a [`StudyConfig`] is
//! internally consistent and never re-validates.
//!
//! Key behaviors
//! -------------
//! - [`StudyConfig::new`] checks all preconditions and returns a typed
//!   [`StudyError`] on the first violation.
//! - [`StudyConfig::default`] reproduces the canonical study: horizon 100,
//!   baseline rate ≈ 1.08 events/period, 1000 replicates, durations
//!   {20, 50, 100}, total changes {0, 0.1, 0.5, 1, 1.5, 2, 2.5, 3}.
//!
//! Invariants & assumptions
//! ------------------------
//! - `horizon >= 1`, `baseline_rate` finite and > 0, `replicates >= 1`.
//! - `durations` non-empty with every entry >= 1.
//! - `total_changes` non-empty with every entry finite and > -1, so the
//!   derived per-period rate keeps all Poisson means strictly positive.
//! - The zero-change baseline is an ordinary entry of `total_changes`;
//!   nothing in the pipeline special-cases it beyond the exact-zero rate
//!   derivation in [`crate::scenario`].
use crate::{
    errors::{StudyError, StudyResult},
    fit::FitOptions,
};

/// Default reference horizon `H` (periods) used to normalize total change.
pub const DEFAULT_HORIZON: usize = 100;

/// Default baseline expected count λ₀ per period.
pub const DEFAULT_BASELINE_RATE: f64 = 1.08;

/// Default number of simulated replicates per scenario.
pub const DEFAULT_REPLICATES: usize = 1000;

/// Default RNG seed for the per-replicate stream splitter.
pub const DEFAULT_SEED: u64 = 0x5EED_5EED_5EED_5EED;

/// Fixed inputs of a power study.
///
/// Construct with [`StudyConfig::new`] (validated) or start from
/// [`StudyConfig::default`] and adjust fields before passing the value on;
/// [`validate`](StudyConfig::validate) re-checks a hand-edited config.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyConfig {
    /// Reference horizon `H`: the number of periods over which every
    /// `total_change` is normalized, independent of scenario duration.
    pub horizon: usize,
    /// Baseline expected count λ₀ at period 1 (no compounding yet).
    pub baseline_rate: f64,
    /// Replicates simulated per scenario.
    pub replicates: usize,
    /// Candidate observation-window lengths, in periods.
    pub durations: Vec<usize>,
    /// Candidate total fractional changes over the reference horizon.
    /// Include `0.0` to measure the false-positive (null) distribution.
    pub total_changes: Vec<f64>,
    /// Master seed; each replicate derives an independent stream from it.
    pub seed: u64,
    /// Optimizer options forwarded to every trend fit.
    pub fit_opts: FitOptions,
}

impl StudyConfig {
    /// Build a validated configuration.
    ///
    /// # Errors
    /// - [`StudyError::InvalidHorizon`] if `horizon == 0`.
    /// - [`StudyError::InvalidBaselineRate`] if `baseline_rate` is
    ///   non-finite or not strictly positive.
    /// - [`StudyError::InvalidReplicates`] if `replicates == 0`.
    /// - [`StudyError::NoDurations`] / [`StudyError::InvalidDuration`] for
    ///   an empty duration set or a zero-length duration.
    /// - [`StudyError::NoTotalChanges`] / [`StudyError::InvalidTotalChange`]
    ///   for an empty change set or a change that is non-finite or <= -1.
    pub fn new(
        horizon: usize, baseline_rate: f64, replicates: usize, durations: Vec<usize>,
        total_changes: Vec<f64>, seed: u64, fit_opts: FitOptions,
    ) -> StudyResult<Self> {
        let config =
            Self { horizon, baseline_rate, replicates, durations, total_changes, seed, fit_opts };
        config.validate()?;
        Ok(config)
    }

    /// Re-check all preconditions on an existing configuration.
    ///
    /// Useful after mutating a [`Default`]-built value in place.
    pub fn validate(&self) -> StudyResult<()> {
        if self.horizon == 0 {
            return Err(StudyError::InvalidHorizon { value: self.horizon });
        }
        if !self.baseline_rate.is_finite() || self.baseline_rate <= 0.0 {
            return Err(StudyError::InvalidBaselineRate { value: self.baseline_rate });
        }
        if self.replicates == 0 {
            return Err(StudyError::InvalidReplicates);
        }
        if self.durations.is_empty() {
            return Err(StudyError::NoDurations);
        }
        for &duration in &self.durations {
            if duration == 0 {
                return Err(StudyError::InvalidDuration { value: duration });
            }
        }
        if self.total_changes.is_empty() {
            return Err(StudyError::NoTotalChanges);
        }
        for &change in &self.total_changes {
            if !change.is_finite() || change <= -1.0 {
                return Err(StudyError::InvalidTotalChange { value: change });
            }
        }
        Ok(())
    }

    /// Number of scenarios the grid will contain (full Cartesian product).
    pub fn scenario_count(&self) -> usize {
        self.durations.len() * self.total_changes.len()
    }
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            baseline_rate: DEFAULT_BASELINE_RATE,
            replicates: DEFAULT_REPLICATES,
            durations: vec![20, 50, 100],
            total_changes: vec![0.0, 0.1, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0],
            seed: DEFAULT_SEED,
            fit_opts: FitOptions::default(),
        }
    }
}
