//! Adapter exposing a [`LogLikelihood`] as an `argmin` problem.
//!
//! Converts the *maximization* of `ℓ(θ)` into a *minimization* of the cost
//! `c(θ) = -ℓ(θ)`. Analytic gradients are negated accordingly; when the
//! model provides none, the gradient of the cost is finite-differenced
//! (central first, forward as the fallback), so no sign flip is needed in
//! that branch.
use std::cell::RefCell;

use crate::fit::{
    errors::FitError,
    traits::LogLikelihood,
    types::{Cost, Grad, Theta},
    validation::validate_grad,
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a model to `argmin`'s `CostFunction` and `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgminAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgminAdapter<'a, F> {
    /// Construct a new adapter over a model and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgminAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`, rejecting non-finite values.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.f.value(theta, self.data)?;
        if !value.is_finite() {
            return Err(FitError::NonFiniteCost { value }.into());
        }
        Ok(-value)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgminAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// With an analytic model gradient: validate and return `-∇ℓ(θ)`.
    /// Without one: central-difference the cost closure; if an evaluation
    /// inside the closure errored (captured via `closure_err`, since the
    /// finite-difference closure must return `f64`) or validation rejects
    /// the result, retry once with forward differences.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(grad) => {
                validate_grad(&grad, dim)?;
                Ok(-grad)
            }
            Err(FitError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_fn = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(value) => value,
                        Err(err) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(err);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_fn);
                if closure_err.borrow().is_none() && validate_grad(&fd_grad, dim).is_ok() {
                    return Ok(fd_grad);
                }
                forward_diff_grad(theta, &cost_fn, &closure_err)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Forward-difference fallback with closure error capture.
///
/// Clears any previously captured error, re-runs the differencing, then
/// surfaces either the captured evaluation error or a validation failure.
fn forward_diff_grad<G: Fn(&Theta) -> f64>(
    theta: &Theta, cost_fn: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(cost_fn);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::errors::FitResult;
    use ndarray::array;

    // Concave quadratic ℓ(θ) = -θ·θ with analytic gradient -2θ.
    struct Quadratic;

    impl LogLikelihood for Quadratic {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> FitResult<f64> {
            Ok(-theta.dot(theta))
        }

        fn check(&self, _: &Theta, _: &()) -> FitResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &()) -> FitResult<Grad> {
            Ok(-2.0 * theta)
        }
    }

    // Same objective, no analytic gradient: exercises the FD fallback.
    struct QuadraticNoGrad;

    impl LogLikelihood for QuadraticNoGrad {
        type Data = ();

        fn value(&self, theta: &Theta, _: &()) -> FitResult<f64> {
            Ok(-theta.dot(theta))
        }

        fn check(&self, _: &Theta, _: &()) -> FitResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // The adapter minimizes: cost must be the negated log-likelihood.
    fn cost_is_negated_loglik() {
        let model = Quadratic;
        let adapter = ArgminAdapter::new(&model, &());
        let theta = array![1.0, 2.0];
        assert_eq!(adapter.cost(&theta).unwrap(), 5.0);
    }

    #[test]
    // Purpose
    // -------
    // Analytic gradients are sign-flipped to cost space: ∇c = -∇ℓ = 2θ.
    fn analytic_gradient_is_sign_flipped() {
        let model = Quadratic;
        let adapter = ArgminAdapter::new(&model, &());
        let grad = adapter.gradient(&array![1.0, -3.0]).unwrap();
        assert!((grad[0] - 2.0).abs() < 1e-12);
        assert!((grad[1] + 6.0).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient the finite-difference fallback must
    // approximate the cost gradient 2θ.
    fn finite_difference_fallback_matches_analytic() {
        let model = QuadraticNoGrad;
        let adapter = ArgminAdapter::new(&model, &());
        let grad = adapter.gradient(&array![1.5, -0.5]).unwrap();
        assert!((grad[0] - 3.0).abs() < 1e-5, "fd grad {grad:?}");
        assert!((grad[1] + 1.0).abs() < 1e-5, "fd grad {grad:?}");
    }
}
