//! Standard errors from the observed information matrix.
//!
//! Purpose
//! -------
//! Turn an observed information matrix `J(θ̂)` into per-parameter standard
//! errors without forming an explicit inverse: symmetric eigendecomposition
//! with eigenvalue truncation yields the diagonal of the Moore–Penrose
//! pseudoinverse, and the SEs are its square roots.
//!
//! Invariants & assumptions
//! ------------------------
//! - The input matrix is square, finite, and symmetric up to numerical
//!   precision; the caller (the trend model) builds it analytically.
//! - Eigenvalues with magnitude at most [`EIGEN_EPS`] are treated as
//!   numerically nonpositive and excluded, which inflates SEs along weakly
//!   identified directions instead of dividing by noise.
//!
//! Conventions
//! -----------
//! - `J(θ̂)` is the negative Hessian of the log-likelihood at the MLE, on
//!   the sum (not average) scale; the resulting SEs correspond to that
//!   scaling directly.
//! - Failure modes are typed: a matrix with no usable eigenvalue is
//!   [`FitError::SingularInformation`], and a non-finite or non-positive
//!   SE is [`FitError::InvalidStandardError`].
use crate::fit::errors::{FitError, FitResult};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Eigenvalues at or below this magnitude are treated as zero.
pub const EIGEN_EPS: f64 = 1e-12;

/// Classical standard errors from an observed information matrix.
///
/// Computes `SE(θ̂_i) = sqrt([J⁺]_{ii})` via symmetric eigendecomposition
/// `J = Q Λ Qᵀ`, summing `Q[i,k]² / λ_k` over eigenvalues `λ_k > EIGEN_EPS`.
///
/// # Errors
/// - [`FitError::SingularInformation`] if no eigenvalue exceeds the
///   truncation threshold.
/// - [`FitError::InvalidStandardError`] if any resulting SE is non-finite
///   or non-positive (a dead parameter direction).
pub fn standard_errors(obs_info: &Array2<f64>) -> FitResult<Array1<f64>> {
    let n = obs_info.ncols();
    let mut obs_info_nalg = DMatrix::<f64>::zeros(n, n);
    fill_dmatrix(obs_info, &mut obs_info_nalg);
    let eigen = obs_info_nalg.symmetric_eigen();
    let q = eigen.eigenvectors;
    let eigenvals = eigen.eigenvalues;
    if !eigenvals.iter().any(|&lambda| lambda > EIGEN_EPS) {
        return Err(FitError::SingularInformation);
    }
    let mut se = Array1::<f64>::zeros(n);
    for i in 0..n {
        let variance: f64 = eigenvals
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum();
        se[i] = variance.sqrt();
        if !se[i].is_finite() || se[i] <= 0.0 {
            return Err(FitError::InvalidStandardError { index: i, value: se[i] });
        }
    }
    Ok(se)
}

/// Copy an `ndarray` information matrix into a `nalgebra::DMatrix`.
///
/// Column-major writes to match `DMatrix` storage; symmetry is preserved
/// as-is, not re-enforced.
fn fill_dmatrix(obs_info: &Array2<f64>, obs_info_nalg: &mut DMatrix<f64>) {
    let n = obs_info.ncols();
    for j in 0..n {
        for i in 0..n {
            obs_info_nalg[(i, j)] = obs_info[[i, j]];
        }
    }
}
