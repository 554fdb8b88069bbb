//! Polynomial feature expansion.
//!
//! A single feature `x` becomes the columns `power_1 = x`, `power_2 = x^2`, ...,
//! `power_d = x^d`. There is no constant column here; the ridge solver fits the
//! intercept separately.

use nalgebra::DMatrix;

use crate::error::AppError;

/// Powers `1..=degree` of one feature, one column per power.
#[derive(Debug, Clone)]
pub struct PolynomialTable {
    names: Vec<String>,
    matrix: DMatrix<f64>,
}

impl PolynomialTable {
    pub fn degree(&self) -> usize {
        self.names.len()
    }

    /// Column names, `power_1` first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Values of `power_k` (1-based).
    pub fn power(&self, k: usize) -> Option<Vec<f64>> {
        if k == 0 || k > self.degree() {
            return None;
        }
        Some(self.matrix.column(k - 1).iter().copied().collect())
    }

    pub fn into_matrix(self) -> DMatrix<f64> {
        self.matrix
    }
}

/// Expand `feature` into its first `degree` powers.
pub fn polynomial_table(feature: &[f64], degree: usize) -> Result<PolynomialTable, AppError> {
    if degree < 1 {
        return Err(AppError::InvalidDegree(degree));
    }
    // Exponents are passed to `powi`, so they must fit in an i32.
    i32::try_from(degree).map_err(|_| AppError::InvalidDegree(degree))?;

    let names = (1..=degree).map(|k| format!("power_{k}")).collect();
    let matrix = DMatrix::from_fn(feature.len(), degree, |i, j| {
        let x = feature[i];
        if j == 0 { x } else { x.powi((j + 1) as i32) }
    });

    Ok(PolynomialTable { names, matrix })
}
