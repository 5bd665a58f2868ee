//! Shared numeric aliases and solver wiring for the fit layer.
//!
//! Keeping the `ndarray`/argmin generics behind canonical aliases lets the
//! rest of the fitting code stay backend-agnostic: parameter vectors,
//! gradients, and the pre-wired L-BFGS solver shapes are named once here.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;

/// Parameter vector `θ` for log-likelihood maximization.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` (or `∇c(θ)` inside the adapter).
pub type Grad = Array1<f64>;

/// Scalar objective value; internally always the cost `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Default history size (`m`) for L-BFGS runs.
///
/// The trend model has two parameters; a short history is plenty.
pub const DEFAULT_LBFGS_MEM: usize = 5;

/// Hager–Zhang line search specialized to this crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
