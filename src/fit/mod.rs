//! fit — argmin-powered maximum-likelihood fitting layer.
//!
//! Purpose
//! -------
//! Provide the generic MLE machinery the trend estimator runs on: a
//! [`LogLikelihood`] trait for models, an adapter into `argmin`'s L-BFGS
//! solvers with finite-difference gradient fallback, validated optimizer
//! configuration, and a normalized [`OptimOutcome`].
//!
//! Key behaviors
//! -------------
//! - [`maximize`] is the single entry point: check the initial guess,
//!   build the configured solver, run it, normalize the result.
//! - Maximization happens by minimizing the cost `c(θ) = -ℓ(θ)`; models
//!   implement the log-likelihood and (optionally) its gradient, never the
//!   cost directly.
//! - Every failure mode crosses this boundary as a typed
//!   [`errors::FitError`]; hard solver errors and non-finite evaluations
//!   are errors, an iteration-cap stop is not.
//!
//! Downstream usage
//! ----------------
//! - [`crate::trend`] implements [`LogLikelihood`] for the Poisson trend
//!   model and calls [`maximize`] once per replicate.
//! - [`crate::config`] embeds [`FitOptions`] so a study carries its
//!   optimizer settings alongside the statistical inputs.

pub mod adapter;
pub mod errors;
pub mod optimizer;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{FitError, FitResult};
pub use self::optimizer::maximize;
pub use self::traits::{FitOptions, LineSearcher, LogLikelihood, OptimOutcome, Tolerances};
pub use self::types::{Cost, Grad, Theta, DEFAULT_LBFGS_MEM};
