//! Scenario generation: the Cartesian grid of drift hypotheses.
//!
//! Purpose
//! -------
//! Expand a study configuration into the exhaustive set of (duration,
//! total-change) combinations and derive, for each, the per-period growth
//! rate whose compounding over the *fixed reference horizon* reproduces
//! the target total change.
//!
//! Key behaviors
//! -------------
//! - [`build_grid`] emits every combination exactly once, durations outer,
//!   total changes inner, so the grid order is deterministic.
//! - [`per_period_rate`] solves `(1 + r)^H = 1 + total_change` for `r` and
//!   returns exactly `0.0` for the zero-change baseline (no floating-point
//!   residue in the null case).
//!
//! Invariants & assumptions
//! ------------------------
//! - Total change is always normalized to the reference horizon `H`, never
//!   to the scenario's own duration. Two scenarios with equal
//!   `total_change` share `annual_rate` regardless of duration; this is
//!   the deliberate design of the study, not an oversight.
//! - Inputs are pre-validated by [`StudyConfig`]; this module performs
//!   pure, infallible computation.
use crate::config::StudyConfig;

/// One drift hypothesis: an observation window plus a true rate of change.
///
/// Immutable once generated; `annual_rate` is derived, not configured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    /// Observation-window length in periods.
    pub duration: usize,
    /// True total fractional change over the reference horizon.
    pub total_change: f64,
    /// Per-period growth rate implied by `total_change` over the horizon.
    pub annual_rate: f64,
}

/// Solve `(1 + r)^horizon = 1 + total_change` for the per-period rate `r`.
///
/// The null case is special-cased so `total_change == 0.0` yields `r == 0.0`
/// exactly; the false-positive analysis downstream keys on that identity.
pub fn per_period_rate(total_change: f64, horizon: usize) -> f64 {
    if total_change == 0.0 {
        return 0.0;
    }
    (1.0 + total_change).powf(1.0 / horizon as f64) - 1.0
}

/// Build the full scenario grid: every `(duration, total_change)` pair once.
pub fn build_grid(config: &StudyConfig) -> Vec<Scenario> {
    let mut grid = Vec::with_capacity(config.scenario_count());
    for &duration in &config.durations {
        for &total_change in &config.total_changes {
            grid.push(Scenario {
                duration,
                total_change,
                annual_rate: per_period_rate(total_change, config.horizon),
            });
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The compounding identity `(1 + r)^H == 1 + total_change`.
    // - Exact-zero rate for the null scenario.
    // - Grid cardinality, uniqueness, and horizon-normalization sharing.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // For every scenario in the default grid, compounding the derived rate
    // over the reference horizon must reproduce the configured total change
    // to floating-point tolerance.
    fn derived_rate_compounds_back_to_total_change() {
        let config = StudyConfig::default();
        let grid = build_grid(&config);
        for scenario in &grid {
            let compounded = (1.0 + scenario.annual_rate).powi(config.horizon as i32) - 1.0;
            assert!(
                (compounded - scenario.total_change).abs() < 1e-10,
                "duration {} total_change {}: compounded {compounded}",
                scenario.duration,
                scenario.total_change,
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // The zero-change baseline must carry a rate of exactly 0.0, not a
    // tiny residue from `powf`.
    fn null_scenario_rate_is_exactly_zero() {
        assert_eq!(per_period_rate(0.0, 100), 0.0);
        assert_eq!(per_period_rate(0.0, 20), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // The grid is the full Cartesian product: |durations| × |total_changes|
    // scenarios, each combination exactly once.
    fn grid_is_full_cartesian_product() {
        let config = StudyConfig::default();
        let grid = build_grid(&config);
        assert_eq!(grid.len(), config.durations.len() * config.total_changes.len());
        for &duration in &config.durations {
            for &total_change in &config.total_changes {
                let matches = grid
                    .iter()
                    .filter(|s| s.duration == duration && s.total_change == total_change)
                    .count();
                assert_eq!(matches, 1, "({duration}, {total_change}) appears {matches} times");
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Normalization is to the reference horizon, not the scenario duration:
    // scenarios with the same total change but different durations share a
    // per-period rate.
    fn rate_is_shared_across_durations() {
        let config = StudyConfig::default();
        let grid = build_grid(&config);
        let short = grid.iter().find(|s| s.duration == 20 && s.total_change == 2.0).unwrap();
        let long = grid.iter().find(|s| s.duration == 100 && s.total_change == 2.0).unwrap();
        assert_eq!(short.annual_rate, long.annual_rate);
        // Tripling over 100 periods is about 1.1% per period.
        assert!((short.annual_rate - 0.011).abs() < 1e-3);
    }
}
