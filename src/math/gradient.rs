//! Batch gradient descent for ordinary least squares.
//!
//! The loss is `RSS(w) = ||y - H w||^2`, whose gradient is `-2 H^T (y - H w)`.
//! Each iteration:
//!
//! - computes `errors = y - H w` once
//! - for every weight `i`, computes `derivative_i = 2 H[:, i] . errors` and
//!   steps `w_i += step_size * derivative_i`
//! - stops when `sqrt(sum_i derivative_i^2) < tolerance`
//!
//! The gradient magnitude accumulates the squared derivative of *every* weight,
//! so convergence means the full gradient is small, not just its last component.

use nalgebra::{DMatrix, DVector, DVectorView};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AppError;
use crate::math::ols::predict_outcome;

/// Iterations between progress log lines.
const PROGRESS_EVERY: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientDescentOptions {
    pub step_size: f64,
    /// Converged once the gradient magnitude drops below this.
    pub tolerance: f64,
    /// Safety cap; exceeding it is a `NonConvergence` error.
    pub max_iterations: usize,
}

impl Default for GradientDescentOptions {
    fn default() -> Self {
        Self {
            step_size: 7e-12,
            tolerance: 2.5e7,
            max_iterations: 100_000,
        }
    }
}

/// Converged weights plus how we got there.
#[derive(Debug, Clone)]
pub struct Descent {
    pub weights: DVector<f64>,
    pub iterations: usize,
    pub gradient_magnitude: f64,
}

/// `2 * feature . errors`, the (negated) RSS derivative for one weight.
pub fn feature_derivative(errors: &DVector<f64>, feature: DVectorView<'_, f64>) -> f64 {
    2.0 * feature.dot(errors)
}

/// Minimize `||output - matrix w||^2` starting from `initial_weights`.
pub fn regression_gradient_descent(
    matrix: &DMatrix<f64>,
    output: &DVector<f64>,
    initial_weights: &DVector<f64>,
    options: &GradientDescentOptions,
) -> Result<Descent, AppError> {
    if initial_weights.len() != matrix.ncols() {
        return Err(AppError::schema(format!(
            "{} initial weights for a design matrix with {} columns",
            initial_weights.len(),
            matrix.ncols()
        )));
    }
    if output.len() != matrix.nrows() {
        return Err(AppError::schema(format!(
            "output has {} rows, design matrix has {}",
            output.len(),
            matrix.nrows()
        )));
    }
    if !(options.step_size.is_finite() && options.step_size > 0.0) {
        return Err(AppError::InvalidArgument(format!(
            "step size must be finite and > 0, got {}",
            options.step_size
        )));
    }
    if !(options.tolerance.is_finite() && options.tolerance > 0.0) {
        return Err(AppError::InvalidArgument(format!(
            "tolerance must be finite and > 0, got {}",
            options.tolerance
        )));
    }
    if options.max_iterations == 0 {
        return Err(AppError::InvalidArgument("max iterations must be >= 1".to_string()));
    }

    let mut weights = initial_weights.clone();
    let mut gradient_magnitude = f64::INFINITY;

    for iteration in 1..=options.max_iterations {
        let predictions = predict_outcome(matrix, &weights);
        let errors = output - predictions;

        let mut gradient_sum_squares = 0.0;
        for i in 0..weights.len() {
            let derivative = feature_derivative(&errors, matrix.column(i));
            gradient_sum_squares += derivative * derivative;
            weights[i] += options.step_size * derivative;
        }
        gradient_magnitude = gradient_sum_squares.sqrt();

        if !gradient_magnitude.is_finite() {
            return Err(AppError::NonConvergence {
                iterations: iteration,
                gradient_magnitude,
            });
        }
        if iteration % PROGRESS_EVERY == 0 {
            debug!(iteration, gradient_magnitude, "gradient descent progress");
        }
        if gradient_magnitude < options.tolerance {
            info!(iterations = iteration, gradient_magnitude, "gradient descent converged");
            return Ok(Descent {
                weights,
                iterations: iteration,
                gradient_magnitude,
            });
        }
    }

    Err(AppError::NonConvergence {
        iterations: options.max_iterations,
        gradient_magnitude,
    })
}
