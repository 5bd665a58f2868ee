//! Validation helpers shared across the fit layer.
//!
//! Centralizes the consistency checks used by the adapter and the outcome
//! constructor: tolerance sanity, gradient dimension/finiteness, estimated
//! parameters, and objective values. All failures surface as typed
//! [`FitError`] values; nothing here panics.
use crate::fit::{
    errors::{FitError, FitResult},
    types::{Grad, Theta},
};

/// Validate the optional gradient-norm tolerance.
///
/// Accepts `None`; a provided value must be finite and strictly positive.
pub fn verify_tol_grad(tol: Option<f64>) -> FitResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(FitError::InvalidTolGrad { tol });
        }
    }
    Ok(())
}

/// Validate the optional cost-change tolerance.
///
/// Accepts `None`; a provided value must be finite and strictly positive.
pub fn verify_tol_cost(tol: Option<f64>) -> FitResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(FitError::InvalidTolCost { tol });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`FitError::GradientDimMismatch`] if the length does not match `dim`.
/// - [`FitError::InvalidGradient`] with the first offending index/value.
pub fn validate_grad(grad: &Grad, dim: usize) -> FitResult<()> {
    if grad.len() != dim {
        return Err(FitError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(FitError::InvalidGradient { index, value });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector.
///
/// # Errors
/// - [`FitError::MissingThetaHat`] if the solver produced no vector.
/// - [`FitError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> FitResult<Theta> {
    match theta_hat {
        Some(theta) => {
            for (index, &value) in theta.iter().enumerate() {
                if !value.is_finite() {
                    return Err(FitError::InvalidThetaHat { index, value });
                }
            }
            Ok(theta)
        }
        None => Err(FitError::MissingThetaHat),
    }
}

/// Validate that a scalar log-likelihood value is finite.
///
/// Arbitrarily negative is fine; `NaN` and ±∞ are not.
pub fn validate_value(value: f64) -> FitResult<()> {
    if !value.is_finite() {
        return Err(FitError::NonFiniteCost { value });
    }
    Ok(())
}
