//! Design-matrix construction.
//!
//! Turns a record table into the `(H, y)` pair used by least squares:
//! `H` has a leading constant column followed by the requested features, and
//! `y` is the output column as an `n x 1` vector.

use nalgebra::{DMatrix, DVector};

use crate::domain::RecordTable;
use crate::error::AppError;

/// Name reported for the bias column.
pub const CONSTANT_COLUMN: &str = "constant";

/// Build the design matrix and target vector for `features` -> `output`.
pub fn design_matrix(
    table: &RecordTable,
    features: &[&str],
    output: &str,
) -> Result<(DMatrix<f64>, DVector<f64>), AppError> {
    let columns = features
        .iter()
        .map(|name| table.numeric_column(name))
        .collect::<Result<Vec<_>, _>>()?;
    let target = table.numeric_column(output)?;

    let n = table.len();
    let matrix = DMatrix::from_fn(n, features.len() + 1, |i, j| {
        if j == 0 { 1.0 } else { columns[j - 1][i] }
    });

    Ok((matrix, DVector::from_vec(target)))
}

/// Column names of a design matrix built from `features`.
pub fn design_columns(features: &[&str]) -> Vec<String> {
    std::iter::once(CONSTANT_COLUMN)
        .chain(features.iter().copied())
        .map(str::to_string)
        .collect()
}
