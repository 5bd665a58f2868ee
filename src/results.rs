//! Collection and summarization of per-replicate fit outcomes.
//!
//! Purpose
//! -------
//! Turn raw `(Scenario, TrendFit)` pairs into analysis-ready rows and
//! grouped summaries. Failed fits are excluded here — and counted, so the
//! exclusion is always visible in the study outcome — and each surviving
//! fit's slope is translated back onto the interpretable scale as the
//! change it implies over the reference horizon.
//!
//! Conventions
//! -----------
//! - `implied_total_change` inverts the scenario construction exactly:
//!   a fitted slope `b` maps to `(1 + b)^H − 1` for reference horizon `H`,
//!   so an estimate of the true per-period rate reproduces the scenario's
//!   total change up to floating-point rounding.
//! - Group summaries are keyed by `(duration, total_change)` and ordered
//!   by that key, durations first.
use std::collections::BTreeMap;

use crate::{scenario::Scenario, trend::TrendFit};

/// One converged replicate, flattened for export and aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub duration: usize,
    pub total_change: f64,
    pub annual_rate: f64,
    pub intercept: f64,
    pub intercept_se: f64,
    pub slope: f64,
    pub slope_se: f64,
    /// The fitted slope compounded over the reference horizon.
    pub implied_total_change: f64,
}

/// Map a fitted per-period slope to the total change it implies over
/// `horizon` periods: `(1 + slope)^horizon − 1`.
pub fn implied_total_change(slope: f64, horizon: usize) -> f64 {
    (1.0 + slope).powi(horizon as i32) - 1.0
}

/// Flatten fit outcomes into rows, dropping failures.
///
/// Returns the surviving rows plus the number of excluded failed fits;
/// `rows.len() + failed` always equals `fits.len()`.
pub fn summarize(fits: &[(Scenario, TrendFit)], horizon: usize) -> (Vec<ResultRow>, usize) {
    let mut rows = Vec::with_capacity(fits.len());
    let mut failed = 0_usize;
    for (scenario, fit) in fits {
        match fit.estimates() {
            Some(est) => rows.push(ResultRow {
                duration: scenario.duration,
                total_change: scenario.total_change,
                annual_rate: scenario.annual_rate,
                intercept: est.intercept,
                intercept_se: est.intercept_se,
                slope: est.slope,
                slope_se: est.slope_se,
                implied_total_change: implied_total_change(est.slope, horizon),
            }),
            None => failed += 1,
        }
    }
    (rows, failed)
}

/// Aggregate statistics for one `(duration, total_change)` cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub duration: usize,
    pub total_change: f64,
    /// Converged fits contributing to this cell.
    pub fits: usize,
    pub mean_implied: f64,
    pub median_implied: f64,
}

/// Group rows by `(duration, total_change)` and summarize each cell.
///
/// Cells are returned in key order: duration ascending, then total change
/// ascending. Scenarios whose every replicate failed simply have no cell.
pub fn group_summaries(rows: &[ResultRow]) -> Vec<GroupSummary> {
    let mut cells: BTreeMap<(usize, u64), Vec<f64>> = BTreeMap::new();
    for row in rows {
        cells
            .entry((row.duration, row.total_change.to_bits()))
            .or_default()
            .push(row.implied_total_change);
    }
    cells
        .into_iter()
        .map(|((duration, change_bits), implied)| {
            let mean = implied.iter().sum::<f64>() / implied.len() as f64;
            GroupSummary {
                duration,
                total_change: f64::from_bits(change_bits),
                fits: implied.len(),
                mean_implied: mean,
                median_implied: median(implied),
            }
        })
        .collect()
}

/// Median of a nonempty sample (consumes and sorts its input).
fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}
