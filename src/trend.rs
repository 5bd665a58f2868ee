//! Poisson log-linear trend estimation: the rate-regression model.
//!
//! Purpose
//! -------
//! Fit `log E[y_t] = β₀ + β₁·t` to one count series by maximum likelihood
//! (Poisson response, log link) and report intercept, slope, and their
//! standard errors from the observed information. A failed fit is an
//! ordinary, first-class outcome: [`fit_trend`] returns a tagged
//! [`TrendFit`] and never lets an error escape to the batch driver.
//!
//! Key behaviors
//! -------------
//! - [`TrendData::new`] validates the series once (length ≥ 2, at least
//!   one nonzero count) and precomputes period indices and the constant
//!   `Σ ln Γ(y_t + 1)` term.
//! - [`TrendModel`] implements [`LogLikelihood`] with analytic value and
//!   gradient; the linear predictor is clamped by [`EtaGuards`] so
//!   exploratory line-search steps can't overflow `exp`.
//! - [`fit_trend`] maximizes via the crate's L-BFGS layer, then derives
//!   SEs from the analytic observed information
//!   `J = Σ μ_t · [1, t; t, t²]` via [`crate::inference`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Periods are 1-based (`t = 1..=n`), matching the simulator's schedule.
//! - Fitting a fixed series is deterministic: repeated invocations return
//!   identical estimates (no randomness after the draw).
//! - An iteration-cap stop still yields estimates (solver-warning tier);
//!   only hard numerical errors produce [`TrendFit::Failed`].
use crate::{
    fit::{
        errors::{FitError, FitResult},
        maximize,
        traits::{FitOptions, LogLikelihood},
        types::{Grad, Theta},
    },
    inference::standard_errors,
};
use ndarray::{array, Array1, Array2};
use statrs::function::gamma::ln_gamma;

/// Clamp range for the linear predictor `η_t = β₀ + β₁·t`.
///
/// `exp(30)` is ~1e13: far beyond any realistic event rate but still
/// comfortably finite, so a wild optimizer step degrades gracefully
/// instead of producing an infinite cost mid-line-search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtaGuards {
    pub min: f64,
    pub max: f64,
}

impl EtaGuards {
    fn clamp(&self, eta: f64) -> f64 {
        eta.clamp(self.min, self.max)
    }
}

impl Default for EtaGuards {
    fn default() -> Self {
        Self { min: -30.0, max: 30.0 }
    }
}

/// A validated count series prepared for trend fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendData {
    counts: Array1<f64>,
    periods: Array1<f64>,
    ln_factorial_sum: f64,
}

impl TrendData {
    /// Validate and prepare a count series.
    ///
    /// # Errors
    /// - [`FitError::SeriesTooShort`] for fewer than two periods.
    /// - [`FitError::DegenerateSeries`] if every count is zero (the
    ///   intercept MLE diverges; such a replicate is excluded downstream).
    pub fn new(counts: &[u64]) -> FitResult<Self> {
        if counts.len() < 2 {
            return Err(FitError::SeriesTooShort { len: counts.len() });
        }
        if counts.iter().all(|&c| c == 0) {
            return Err(FitError::DegenerateSeries);
        }
        let ln_factorial_sum = counts.iter().map(|&c| ln_gamma(c as f64 + 1.0)).sum();
        Ok(Self {
            counts: counts.iter().map(|&c| c as f64).collect(),
            periods: (1..=counts.len()).map(|t| t as f64).collect(),
            ln_factorial_sum,
        })
    }

    /// Number of periods in the series.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when the series holds no periods (unreachable post-validation).
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sample mean count; strictly positive after validation.
    pub fn mean_count(&self) -> f64 {
        self.counts.sum() / self.len() as f64
    }
}

/// The Poisson log-linear trend model `log E[y_t] = β₀ + β₁·t`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrendModel {
    pub guards: EtaGuards,
}

impl LogLikelihood for TrendModel {
    type Data = TrendData;

    /// Full Poisson log-likelihood
    /// `ℓ(β) = Σ [y_t·η_t − exp(η_t)] − Σ ln Γ(y_t + 1)`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> FitResult<f64> {
        let (b0, b1) = (theta[0], theta[1]);
        let mut ll = -data.ln_factorial_sum;
        for (&y, &t) in data.counts.iter().zip(data.periods.iter()) {
            let eta = self.guards.clamp(b0 + b1 * t);
            ll += y * eta - eta.exp();
        }
        Ok(ll)
    }

    /// Two parameters, both finite.
    fn check(&self, theta: &Theta, _data: &Self::Data) -> FitResult<()> {
        if theta.len() != 2 {
            return Err(FitError::GradientDimMismatch { expected: 2, found: theta.len() });
        }
        for (index, &value) in theta.iter().enumerate() {
            if !value.is_finite() {
                return Err(FitError::InvalidThetaHat { index, value });
            }
        }
        Ok(())
    }

    /// Analytic score: `∂ℓ/∂β₀ = Σ (y_t − μ_t)`, `∂ℓ/∂β₁ = Σ t·(y_t − μ_t)`.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> FitResult<Grad> {
        let (b0, b1) = (theta[0], theta[1]);
        let mut g0 = 0.0;
        let mut g1 = 0.0;
        for (&y, &t) in data.counts.iter().zip(data.periods.iter()) {
            let mu = self.guards.clamp(b0 + b1 * t).exp();
            g0 += y - mu;
            g1 += t * (y - mu);
        }
        Ok(array![g0, g1])
    }
}

impl TrendModel {
    /// Observed information `J(β̂) = Σ μ_t · [1, t; t, t²]` at the MLE.
    pub fn observed_information(&self, theta_hat: &Theta, data: &TrendData) -> Array2<f64> {
        let (b0, b1) = (theta_hat[0], theta_hat[1]);
        let mut info = Array2::<f64>::zeros((2, 2));
        for &t in data.periods.iter() {
            let mu = self.guards.clamp(b0 + b1 * t).exp();
            info[[0, 0]] += mu;
            info[[0, 1]] += t * mu;
            info[[1, 1]] += t * t * mu;
        }
        info[[1, 0]] = info[[0, 1]];
        info
    }
}

/// Point estimates and uncertainty from one successful trend fit.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendEstimates {
    /// Fitted intercept `β̂₀` (log scale).
    pub intercept: f64,
    /// Standard error of the intercept.
    pub intercept_se: f64,
    /// Fitted per-period slope `β̂₁` (log scale).
    pub slope: f64,
    /// Standard error of the slope.
    pub slope_se: f64,
    /// Maximized log-likelihood `ℓ(β̂)`.
    pub loglik: f64,
    /// Optimizer iterations used.
    pub iterations: usize,
}

/// Terminal outcome of fitting one replicate: success or a typed failure.
///
/// Never retried; re-running on the same (already drawn) series would
/// converge or fail identically.
#[derive(Debug, Clone, PartialEq)]
pub enum TrendFit {
    Converged(TrendEstimates),
    Failed(FitError),
}

impl TrendFit {
    /// True when the fit produced estimates.
    pub fn is_converged(&self) -> bool {
        matches!(self, TrendFit::Converged(_))
    }

    /// The estimates, when present.
    pub fn estimates(&self) -> Option<&TrendEstimates> {
        match self {
            TrendFit::Converged(est) => Some(est),
            TrendFit::Failed(_) => None,
        }
    }
}

/// Fit the trend model to one count series.
///
/// Every failure path — degenerate input, non-finite likelihood,
/// line-search breakdown, singular information — lands in
/// [`TrendFit::Failed`]; nothing propagates to the caller.
pub fn fit_trend(counts: &[u64], opts: &FitOptions) -> TrendFit {
    match fit_trend_inner(counts, opts) {
        Ok(estimates) => TrendFit::Converged(estimates),
        Err(err) => TrendFit::Failed(err),
    }
}

fn fit_trend_inner(counts: &[u64], opts: &FitOptions) -> FitResult<TrendEstimates> {
    let data = TrendData::new(counts)?;
    let model = TrendModel::default();
    // Start at the stationary fit: intercept at the log sample mean,
    // zero slope. The mean is positive post-validation.
    let theta0 = array![data.mean_count().ln(), 0.0];
    let outcome = maximize(&model, theta0, &data, opts)?;
    let info = model.observed_information(&outcome.theta_hat, &data);
    let se = standard_errors(&info)?;
    Ok(TrendEstimates {
        intercept: outcome.theta_hat[0],
        intercept_se: se[0],
        slope: outcome.theta_hat[1],
        slope_se: se[1],
        loglik: outcome.value,
        iterations: outcome.iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Input validation (short and all-zero series).
    // - Recovery of a known log-linear trend from near-noiseless counts.
    // - Determinism of repeated fits on a fixed series.
    // - Score-at-optimum and information sanity.
    //
    // They intentionally DO NOT cover:
    // - Sampling variability across replicates (integration tests).
    // -------------------------------------------------------------------------

    /// Deterministic counts following exp(b0 + b1·t), rounded.
    fn deterministic_counts(b0: f64, b1: f64, n: usize) -> Vec<u64> {
        (1..=n).map(|t| (b0 + b1 * t as f64).exp().round() as u64).collect()
    }

    #[test]
    // Purpose
    // -------
    // Series that cannot identify the model are rejected as typed
    // failures, not panics.
    fn degenerate_inputs_become_failed_fits() {
        let opts = FitOptions::default();
        assert_eq!(
            fit_trend(&[], &opts),
            TrendFit::Failed(FitError::SeriesTooShort { len: 0 })
        );
        assert_eq!(
            fit_trend(&[3], &opts),
            TrendFit::Failed(FitError::SeriesTooShort { len: 1 })
        );
        assert_eq!(
            fit_trend(&[0; 40], &opts),
            TrendFit::Failed(FitError::DegenerateSeries)
        );
    }

    #[test]
    // Purpose
    // -------
    // On a large, nearly noiseless exponential-trend series the MLE must
    // land close to the generating parameters, with finite positive SEs.
    //
    // Given
    // -----
    // - Counts round(exp(1.0 + 0.02·t)) for t = 1..=120.
    //
    // Expect
    // ------
    // - Slope within 5e-3 of 0.02, intercept within 5e-2 of 1.0.
    // - Both SEs finite and positive; slope SE well below the slope.
    fn recovers_known_trend_from_clean_counts() {
        let counts = deterministic_counts(1.0, 0.02, 120);

        let fit = fit_trend(&counts, &FitOptions::default());

        let est = fit.estimates().expect("clean series should converge");
        assert!((est.slope - 0.02).abs() < 5e-3, "slope {}", est.slope);
        assert!((est.intercept - 1.0).abs() < 5e-2, "intercept {}", est.intercept);
        assert!(est.slope_se > 0.0 && est.slope_se.is_finite());
        assert!(est.intercept_se > 0.0 && est.intercept_se.is_finite());
        assert!(est.slope_se < 0.02);
    }

    #[test]
    // Purpose
    // -------
    // Fitting is idempotent: a fixed series yields bit-identical
    // estimates on repeated invocation.
    fn repeated_fits_are_identical() {
        let counts = deterministic_counts(0.5, 0.01, 60);
        let opts = FitOptions::default();

        let first = fit_trend(&counts, &opts);
        let second = fit_trend(&counts, &opts);

        assert!(first.is_converged());
        assert_eq!(first, second);
    }

    #[test]
    // Purpose
    // -------
    // The analytic score vanishes (approximately) at the fitted optimum.
    fn score_is_near_zero_at_optimum() {
        let counts = deterministic_counts(0.8, 0.015, 80);
        let data = TrendData::new(&counts).unwrap();
        let model = TrendModel::default();
        let est = fit_trend(&counts, &FitOptions::default())
            .estimates()
            .cloned()
            .expect("fit converges");

        let grad = model.grad(&array![est.intercept, est.slope], &data).unwrap();

        // Score components scale with Σy and Σt·y; normalize by n.
        let n = counts.len() as f64;
        assert!(grad[0].abs() / n < 1e-3, "score[0] = {}", grad[0]);
        assert!(grad[1].abs() / n < 1e-1, "score[1] = {}", grad[1]);
    }

    #[test]
    // Purpose
    // -------
    // The observed information is symmetric with positive diagonal, and
    // grows with series length (longer windows are more informative).
    fn information_grows_with_window_length() {
        let model = TrendModel::default();
        let short = TrendData::new(&deterministic_counts(1.0, 0.0, 20)).unwrap();
        let long = TrendData::new(&deterministic_counts(1.0, 0.0, 100)).unwrap();
        let theta = array![1.0, 0.0];

        let info_short = model.observed_information(&theta, &short);
        let info_long = model.observed_information(&theta, &long);

        assert_eq!(info_short[[0, 1]], info_short[[1, 0]]);
        assert!(info_short[[0, 0]] > 0.0 && info_short[[1, 1]] > 0.0);
        assert!(info_long[[0, 0]] > info_short[[0, 0]]);
        assert!(info_long[[1, 1]] > info_short[[1, 1]]);
    }

    #[test]
    // Purpose
    // -------
    // The likelihood value matches a hand-computed reference on a tiny
    // series (y = [1, 2], β = (0, 0): ℓ = Σ y·0 − e⁰ − lnΓ(y+1)).
    fn loglik_matches_hand_computation() {
        let data = TrendData::new(&[1, 2]).unwrap();
        let model = TrendModel::default();

        let ll = model.value(&array![0.0, 0.0], &data).unwrap();

        // ℓ = (0 − 1 − ln 1!) + (0 − 1 − ln 2!) = −2 − ln 2.
        let expected = -2.0 - 2.0_f64.ln();
        assert!((ll - expected).abs() < 1e-12, "ll = {ll}");
    }
}
