use std::path::PathBuf;

use thiserror::Error;

/// Every failure the library can report.
///
/// Errors are local to the call that produced them: nothing is retried and no
/// partial result is returned alongside an error.
#[derive(Debug, Error)]
pub enum AppError {
    /// A column is missing, not numeric, or has the wrong shape.
    #[error("schema error: {0}")]
    Schema(String),

    /// A CSV field could not be parsed or coerced to its declared type.
    #[error("malformed input at line {line}, column `{column}`: {message}")]
    MalformedInput {
        line: usize,
        column: String,
        message: String,
    },

    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid polynomial degree {0} (must be >= 1)")]
    InvalidDegree(usize),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Gradient descent ran out of iterations or diverged.
    #[error(
        "gradient descent did not converge after {iterations} iterations (gradient magnitude {gradient_magnitude:e})"
    )]
    NonConvergence {
        iterations: usize,
        gradient_magnitude: f64,
    },

    #[error("solver error: {0}")]
    Solver(String),

    #[error("plot error: {0}")]
    Plot(String),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    pub fn solver(message: impl Into<String>) -> Self {
        Self::Solver(message.into())
    }

    /// Process exit code for the `polyridge` binary.
    ///
    /// - `2`: bad input (files, columns, arguments)
    /// - `4`: numerical failure (solver, convergence, rendering)
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Schema(_)
            | AppError::MalformedInput { .. }
            | AppError::Io { .. }
            | AppError::InvalidDegree(_)
            | AppError::InvalidArgument(_)
            | AppError::Json(_) => 2,
            AppError::NonConvergence { .. } | AppError::Solver(_) | AppError::Plot(_) => 4,
        }
    }
}
