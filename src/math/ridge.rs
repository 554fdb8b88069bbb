//! Ridge (L2-penalized) linear regression.
//!
//! ```text
//! minimize ||y - b0 - X b||^2 + alpha ||b||^2
//! ```
//!
//! The intercept `b0` is not penalized. It is removed by centering `X` and `y`,
//! the penalized problem is solved for `b`, and `b0` is recovered from the means.
//!
//! With `normalize` on, each centered column is divided by its L2 norm before
//! solving and the coefficients are scaled back afterwards. The penalty then
//! acts on comparable scales, which matters a lot for polynomial columns whose
//! magnitudes differ by tens of orders of magnitude.
//!
//! With `normalize` off the columns are scaled the same way for the solve, but
//! the penalty rows become `sqrt(alpha) / s_j`, so the minimized objective is
//! still the one on raw columns.
//!
//! The penalized normal equations `(X^T X + alpha I) b = X^T y` are solved as the
//! equivalent augmented least-squares system
//!
//! ```text
//! [ X            ]     [ y ]
//! [ sqrt(alpha) I ] b = [ 0 ]
//! ```
//!
//! which avoids squaring the condition number of `X`.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::error::AppError;
use crate::math::ols::solve_least_squares;

/// Fitted ridge model: `y = intercept + X coef`.
#[derive(Debug, Clone)]
pub struct RidgeCoefficients {
    pub intercept: f64,
    pub coef: DVector<f64>,
}

impl RidgeCoefficients {
    pub fn predict(&self, x: &DMatrix<f64>) -> DVector<f64> {
        (x * &self.coef).add_scalar(self.intercept)
    }

    /// `[intercept, coef_1, ..., coef_p]`.
    pub fn weights(&self) -> Vec<f64> {
        std::iter::once(self.intercept).chain(self.coef.iter().copied()).collect()
    }
}

/// A regularized regression backend.
pub trait RidgeSolver {
    fn solve(
        &self,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        l2_penalty: f64,
        normalize: bool,
    ) -> Result<RidgeCoefficients, AppError>;
}

/// Ridge regression with centering and optional L2-norm column scaling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedRidge;

impl RidgeSolver for NormalizedRidge {
    fn solve(
        &self,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        l2_penalty: f64,
        normalize: bool,
    ) -> Result<RidgeCoefficients, AppError> {
        let (n, p) = x.shape();
        if n == 0 {
            return Err(AppError::schema("cannot fit ridge regression on zero rows"));
        }
        if n != y.len() {
            return Err(AppError::schema(format!(
                "design matrix has {n} rows but target has {}",
                y.len()
            )));
        }
        if !(l2_penalty.is_finite() && l2_penalty >= 0.0) {
            return Err(AppError::InvalidArgument(format!(
                "l2 penalty must be finite and >= 0, got {l2_penalty}"
            )));
        }

        let x_mean = DVector::from_fn(p, |j, _| x.column(j).mean());
        let y_mean = y.mean();

        let mut xc = x.clone();
        for (j, mut col) in xc.column_iter_mut().enumerate() {
            col.add_scalar_mut(-x_mean[j]);
        }
        let yc = y.add_scalar(-y_mean);

        // Columns are always solved at unit norm; raw polynomial columns span
        // dozens of orders of magnitude and SVD would drop the small ones.
        let scale = DVector::from_fn(p, |j, _| {
            let norm = xc.column(j).norm();
            // A constant column centers to zero; leave it unscaled.
            if norm > 0.0 && norm.is_finite() { norm } else { 1.0 }
        });
        for (j, mut col) in xc.column_iter_mut().enumerate() {
            col /= scale[j];
        }

        let (a, b) = if l2_penalty > 0.0 {
            let root = l2_penalty.sqrt();
            let mut a = DMatrix::<f64>::zeros(n + p, p);
            a.rows_mut(0, n).copy_from(&xc);
            for j in 0..p {
                // Unnormalized fits penalize the raw coefficient `b_j = c_j / s_j`.
                a[(n + j, j)] = if normalize { root } else { root / scale[j] };
            }
            let mut b = DVector::<f64>::zeros(n + p);
            b.rows_mut(0, n).copy_from(&yc);
            (a, b)
        } else {
            (xc, yc)
        };

        let scaled = solve_least_squares(&a, &b).ok_or_else(|| {
            AppError::solver(format!("ridge solve failed (n={n}, p={p}, l2_penalty={l2_penalty:e})"))
        })?;

        let coef = scaled.component_div(&scale);
        let intercept = y_mean - x_mean.dot(&coef);
        if !intercept.is_finite() || coef.iter().any(|v| !v.is_finite()) {
            return Err(AppError::solver("ridge solve produced non-finite coefficients"));
        }

        debug!(n, p, l2_penalty, normalize, intercept, "ridge solve");
        Ok(RidgeCoefficients { intercept, coef })
    }
}
