//! Least squares primitives.
//!
//! Everything here works on a design matrix `H` (rows = observations) and
//! column vectors:
//!
//! ```text
//! prediction = H w
//! RSS        = (y - H w)^T (y - H w)
//! ```
//!
//! Implementation choices:
//! - We use SVD to solve least-squares problems because the design matrix is
//!   tall (more rows than columns). Nalgebra's `QR::solve` is intended for
//!   square systems and will panic for non-square matrices.
//! - High-degree polynomial columns are close to collinear, so the solve retries
//!   with progressively looser singular-value cutoffs before giving up.

use nalgebra::{DMatrix, DVector};

/// Solve `min ||y - x b||^2` using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() != y.len() || x.ncols() == 0 {
        return None;
    }
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Predictions `H w`.
pub fn predict_outcome(features: &DMatrix<f64>, weights: &DVector<f64>) -> DVector<f64> {
    features * weights
}

/// Residual sum of squares between observed and predicted outputs.
pub fn residual_sum_squares(output: &DVector<f64>, predicted: &DVector<f64>) -> f64 {
    let residual = output - predicted;
    residual.dot(&residual)
}
