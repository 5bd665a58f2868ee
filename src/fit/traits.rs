//! Public configuration and contract surface for log-likelihood fitting.
//!
//! - [`LogLikelihood`]: trait a model implements to be fitted.
//! - [`FitOptions`] and [`Tolerances`]: optimizer configuration.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by `maximize`.
//!
//! Convention: the crate *maximizes* a log-likelihood `ℓ(θ)` by minimizing
//! the cost `c(θ) = -ℓ(θ)`. An analytic gradient, when provided, is the
//! gradient of the log-likelihood; the adapter flips the sign.
use crate::fit::{
    errors::{FitError, FitResult},
    types::{Grad, Theta},
    validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Model-side interface for maximum-likelihood fitting.
///
/// Implement `value` (the log-likelihood `ℓ(θ)`) and `check` (a one-time
/// validation hook run before optimization). `grad` is optional: when it
/// returns [`FitError::GradientNotImplemented`] the adapter falls back to
/// finite differences of the cost.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> FitResult<f64>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> FitResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> FitResult<Grad> {
        Err(FitError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parses case-insensitively from `"MoreThuente"` / `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(FitError::InvalidLineSearch { name: s.to_string() }),
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// Any field can be `None` but at least one of the three must be provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`FitError::NoTolerancesProvided`] if all three are `None`.
    /// - [`FitError::InvalidTolGrad`] / [`FitError::InvalidTolCost`] for
    ///   non-finite or non-positive values.
    /// - [`FitError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> FitResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(FitError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if max_iter == Some(0) {
            return Err(FitError::InvalidMaxIter);
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Optimizer-level configuration for trend fits.
///
/// Defaults suit the two-parameter Poisson trend model: `tol_grad = 1e-8`,
/// `max_iter = 100`, More–Thuente line search, default L-BFGS memory.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl FitOptions {
    /// Create a new set of optimizer options.
    ///
    /// Numeric validation of the tolerances happens in [`Tolerances::new`];
    /// this constructor only rejects a zero L-BFGS memory.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> FitResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(FitError::InvalidLbfgsMem { mem: 0 });
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-8), tol_cost: None, max_iter: Some(100) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found (validated finite).
/// - `value`: best log-likelihood `ℓ(θ̂)` (not the cost).
/// - `converged`: `true` for any terminating status other than
///   `NotTerminated`. An iteration-cap stop still counts as terminated;
///   the distinction is recorded in `status`, mirroring the solver's
///   warning-versus-error severity split.
/// - `status`: human-readable termination status.
/// - `iterations`: optimizer iterations performed.
/// - `grad_norm`: norm of the last available gradient, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// Propagates validation errors for a missing/non-finite `theta_hat`
    /// or a non-finite best value.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        grad: Option<Grad>,
    ) -> FitResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations: iterations as usize, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmin::core::TerminationReason;
    use ndarray::array;

    #[test]
    fn tolerances_require_at_least_one_rule() {
        assert_eq!(Tolerances::new(None, None, None), Err(FitError::NoTolerancesProvided));
        assert!(Tolerances::new(Some(1e-8), None, None).is_ok());
        assert!(Tolerances::new(None, None, Some(50)).is_ok());
        assert_eq!(Tolerances::new(None, None, Some(0)), Err(FitError::InvalidMaxIter));
    }

    #[test]
    fn line_searcher_parses_case_insensitively() {
        assert_eq!(LineSearcher::from_str("morethuente").unwrap(), LineSearcher::MoreThuente);
        assert_eq!(LineSearcher::from_str("HAGERZHANG").unwrap(), LineSearcher::HagerZhang);
        assert!(matches!(
            LineSearcher::from_str("newton"),
            Err(FitError::InvalidLineSearch { .. })
        ));
    }

    #[test]
    fn fit_options_reject_zero_lbfgs_memory() {
        let tols = Tolerances::new(Some(1e-8), None, Some(100)).unwrap();
        assert_eq!(
            FitOptions::new(tols, LineSearcher::MoreThuente, false, Some(0)),
            Err(FitError::InvalidLbfgsMem { mem: 0 })
        );
        assert!(FitOptions::new(tols, LineSearcher::MoreThuente, false, Some(3)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Termination mapping: any terminated status (including an iteration
    // cap) counts as converged with the reason recorded; `NotTerminated`
    // does not.
    fn outcome_maps_termination_status() {
        let outcome = OptimOutcome::new(
            Some(array![0.1, 0.2]),
            -10.0,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            42,
            None,
        )
        .unwrap();
        assert!(outcome.converged);
        assert!(outcome.status.contains("MaxItersReached"));
        assert_eq!(outcome.iterations, 42);

        let outcome = OptimOutcome::new(
            Some(array![0.1, 0.2]),
            -10.0,
            TerminationStatus::NotTerminated,
            0,
            Some(array![3.0, 4.0]),
        )
        .unwrap();
        assert!(!outcome.converged);
        assert_eq!(outcome.grad_norm, Some(5.0));
    }

    #[test]
    fn outcome_rejects_missing_or_nonfinite_state() {
        assert_eq!(
            OptimOutcome::new(None, -1.0, TerminationStatus::NotTerminated, 0, None),
            Err(FitError::MissingThetaHat)
        );
        assert!(matches!(
            OptimOutcome::new(
                Some(array![f64::NAN]),
                -1.0,
                TerminationStatus::NotTerminated,
                0,
                None
            ),
            Err(FitError::InvalidThetaHat { .. })
        ));
    }
}
