//! Polynomial ridge fit of one feature against one output.
//!
//! Given a training table, we:
//!
//! - expand `feature` into `power_1..power_degree`
//! - fit ridge regression on those columns (intercept handled by the solver)
//! - score the training data, and the validation table if one is supplied,
//!   with the residual sum of squares
//!
//! Rendering is not done here. When plotting is requested the fit carries the
//! `(x, y, y_fit)` series and the caller decides how to draw it.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::{FitSeries, PlotConfig, PolyFit, RecordTable};
use crate::error::AppError;
use crate::features::polynomial_table;
use crate::math::{NormalizedRidge, RidgeSolver, residual_sum_squares};

/// Everything that configures a polynomial fit apart from the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyFitOptions {
    pub degree: usize,
    pub feature: String,
    pub output: String,
    pub l2_penalty: f64,
    /// Scale centered columns to unit L2 norm before solving.
    pub normalize: bool,
    /// When set, the fit carries its plot series.
    pub plot: Option<PlotConfig>,
}

impl Default for PolyFitOptions {
    fn default() -> Self {
        Self {
            degree: 1,
            feature: "sqft_living".to_string(),
            output: "price".to_string(),
            l2_penalty: 1e-9,
            normalize: true,
            plot: None,
        }
    }
}

/// Fit with the bundled ridge solver.
pub fn fit_poly_model(
    train: &RecordTable,
    validation: Option<&RecordTable>,
    options: &PolyFitOptions,
) -> Result<PolyFit, AppError> {
    fit_poly_model_with(&NormalizedRidge, train, validation, options)
}

/// Fit with any ridge backend.
pub fn fit_poly_model_with<S: RidgeSolver>(
    solver: &S,
    train: &RecordTable,
    validation: Option<&RecordTable>,
    options: &PolyFitOptions,
) -> Result<PolyFit, AppError> {
    if train.is_empty() {
        return Err(AppError::schema("training table has no rows"));
    }

    let (x, y) = poly_design(train, &options.feature, &options.output, options.degree)?;
    let model = solver.solve(&x, &y, options.l2_penalty, options.normalize)?;

    let predicted = model.predict(&x);
    let train_rss = residual_sum_squares(&y, &predicted);

    let validation_rss = match validation {
        None => None,
        Some(table) => {
            if table.is_empty() {
                warn!("validation table has no rows; its RSS is 0");
            }
            let (xv, yv) = poly_design(table, &options.feature, &options.output, options.degree)?;
            Some(residual_sum_squares(&yv, &model.predict(&xv)))
        }
    };

    let series = options.plot.as_ref().map(|config| FitSeries {
        x: x.column(0).iter().copied().collect(),
        y: y.iter().copied().collect(),
        y_fit: predicted.iter().copied().collect(),
        config: config.clone(),
    });

    info!(
        degree = options.degree,
        rows = train.len(),
        l2_penalty = options.l2_penalty,
        train_rss,
        validation_rss = ?validation_rss,
        "polynomial ridge fit"
    );

    Ok(PolyFit {
        degree: options.degree,
        feature: options.feature.clone(),
        output: options.output.clone(),
        l2_penalty: options.l2_penalty,
        normalize: options.normalize,
        weights: model.weights(),
        train_rss,
        validation_rss,
        series,
    })
}

/// Polynomial columns of `feature` and the `output` vector.
fn poly_design(
    table: &RecordTable,
    feature: &str,
    output: &str,
    degree: usize,
) -> Result<(DMatrix<f64>, DVector<f64>), AppError> {
    let poly = polynomial_table(&table.numeric_column(feature)?, degree)?;
    let target = DVector::from_vec(table.numeric_column(output)?);
    Ok((poly.into_matrix(), target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{RidgeCoefficients, solve_least_squares};

    fn cubic_table(xs: &[f64]) -> RecordTable {
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 - x + 0.5 * x * x * x).collect();
        RecordTable::from_columns(&[("sqft_living", xs), ("price", &ys)]).unwrap()
    }

    fn options(degree: usize) -> PolyFitOptions {
        PolyFitOptions {
            degree,
            l2_penalty: 1e-12,
            ..PolyFitOptions::default()
        }
    }

    #[test]
    fn weights_are_intercept_then_powers() {
        let xs: Vec<f64> = (0..30).map(|i| -3.0 + i as f64 * 0.2).collect();
        let fit = fit_poly_model(&cubic_table(&xs), None, &options(3)).unwrap();

        assert_eq!(fit.weights.len(), 4);
        let expected = [3.0, -1.0, 0.0, 0.5];
        for (w, e) in fit.weights.iter().zip(expected.iter()) {
            assert!((w - e).abs() < 1e-6, "weight {w} vs {e}");
        }
        assert!(fit.train_rss >= 0.0 && fit.train_rss < 1e-9);
        assert!(fit.validation_rss.is_none());
        assert!(fit.series.is_none());
    }

    #[test]
    fn vanishing_penalty_matches_least_squares() {
        let xs: Vec<f64> = (0..40).map(|i| i as f64 * 0.25).collect();
        let ys: Vec<f64> = xs.iter().enumerate().map(|(i, x)| 10.0 + 4.0 * x + (i as f64 * 0.7).cos()).collect();
        let table = RecordTable::from_columns(&[("sqft_living", &xs), ("price", &ys)]).unwrap();

        let fit = fit_poly_model(&table, None, &options(2)).unwrap();

        let h = DMatrix::from_fn(xs.len(), 3, |i, j| xs[i].powi(j as i32));
        let ols = solve_least_squares(&h, &DVector::from_vec(ys)).unwrap();
        for (w, b) in fit.weights.iter().zip(ols.iter()) {
            assert!((w - b).abs() < 1e-6 * b.abs().max(1.0));
        }
    }

    #[test]
    fn validation_uses_training_model() {
        let train_x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let train = cubic_table(&train_x);
        let valid = RecordTable::from_columns(&[("sqft_living", &[1.0, 2.0]), ("price", &[10.0, 20.0])]).unwrap();

        let fit = fit_poly_model(&train, Some(&valid), &options(3)).unwrap();
        // The model reproduces the cubic, so validation error is against 3 - x + x^3/2.
        let expected = (10.0 - 2.5_f64).powi(2) + (20.0 - 5.0_f64).powi(2);
        let rss = fit.validation_rss.unwrap();
        assert!((rss - expected).abs() < 1e-4 * expected);
    }

    #[test]
    fn exact_fit_on_validation_gives_zero_not_none() {
        let xs: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let table = cubic_table(&xs);
        let fit = fit_poly_model(&table, Some(&table), &options(3)).unwrap();
        let rss = fit.validation_rss.unwrap();
        assert!(rss >= 0.0 && rss < 1e-9);
    }

    #[test]
    fn plot_series_is_exposed_on_request() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let table = cubic_table(&xs);
        let opts = PolyFitOptions {
            plot: Some(PlotConfig::default()),
            ..options(1)
        };
        let fit = fit_poly_model(&table, None, &opts).unwrap();
        let series = fit.series.unwrap();
        assert_eq!(series.x, xs.to_vec());
        assert_eq!(series.y.len(), 4);
        assert_eq!(series.y_fit.len(), 4);
        let rss: f64 = series.y.iter().zip(&series.y_fit).map(|(a, b)| (a - b).powi(2)).sum();
        assert!((rss - fit.train_rss).abs() < 1e-9 * fit.train_rss.max(1.0));
    }

    #[test]
    fn errors_propagate() {
        let table = cubic_table(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            fit_poly_model(&table, None, &options(0)),
            Err(AppError::InvalidDegree(0))
        ));
        let opts = PolyFitOptions {
            feature: "sqft_lot".to_string(),
            ..options(2)
        };
        assert!(matches!(fit_poly_model(&table, None, &opts), Err(AppError::Schema(_))));

        let empty = RecordTable::from_columns(&[("sqft_living", &[]), ("price", &[])]).unwrap();
        assert!(matches!(fit_poly_model(&empty, None, &options(1)), Err(AppError::Schema(_))));
    }

    #[test]
    fn raw_high_degree_fit_is_no_worse_than_a_line() {
        use rand::prelude::*;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(11);
        let sqft: Vec<f64> = (0..2000).map(|_| rng.gen_range(500.0..3700.0)).collect();
        let price: Vec<f64> = sqft
            .iter()
            .map(|s| -47_000.0 + 281.0 * s + rng.gen_range(-100_000.0..100_000.0))
            .collect();
        let table = RecordTable::from_columns(&[("sqft_living", &sqft[..]), ("price", &price[..])]).unwrap();

        let raw = |degree| PolyFitOptions {
            degree,
            l2_penalty: 1.5e-5,
            normalize: false,
            ..PolyFitOptions::default()
        };
        let line = fit_poly_model(&table, None, &raw(1)).unwrap();
        let high = fit_poly_model(&table, None, &raw(15)).unwrap();

        assert!((line.coefficient(1).unwrap() - 281.0).abs() < 10.0);
        // Any degree-1 model is also a degree-15 model.
        assert!(
            high.train_rss <= line.train_rss * (1.0 + 1e-9),
            "degree 15 RSS {:e} vs degree 1 RSS {:e}",
            high.train_rss,
            line.train_rss
        );
    }

    struct FixedSolver;

    impl RidgeSolver for FixedSolver {
        fn solve(
            &self,
            x: &DMatrix<f64>,
            _y: &DVector<f64>,
            _l2_penalty: f64,
            _normalize: bool,
        ) -> Result<RidgeCoefficients, AppError> {
            Ok(RidgeCoefficients {
                intercept: 0.0,
                coef: DVector::from_element(x.ncols(), 1.0),
            })
        }
    }

    #[test]
    fn solver_is_pluggable() {
        let table = RecordTable::from_columns(&[("sqft_living", &[1.0, 2.0, 3.0]), ("price", &[2.0, 5.0, 6.0])])
            .unwrap();
        // power_1 only with weight 1 -> predictions [1, 2, 3].
        let fit = fit_poly_model_with(&FixedSolver, &table, None, &options(1)).unwrap();
        assert_eq!(fit.weights, vec![0.0, 1.0]);
        assert_eq!(fit.train_rss, 1.0 + 9.0 + 9.0);
    }
}
