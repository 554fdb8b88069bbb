//! Shared "load -> fit" workflow behind each subcommand.
//!
//! Every entry point takes paths and plain option structs so the CLI handlers
//! only deal with presentation (text, JSON, plots).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use nalgebra::DVector;
use tracing::info;

use crate::domain::{GradientDescentFit, PolyFit, RecordTable, SubsetReport};
use crate::error::AppError;
use crate::features::{design_columns, design_matrix};
use crate::fit::{PolyFitOptions, fit_poly_model, fit_subsets};
use crate::io::load_sales;
use crate::math::{GradientDescentOptions, predict_outcome, regression_gradient_descent, residual_sum_squares};

/// Feature/target selection plus solver knobs for a gradient-descent run.
#[derive(Debug, Clone)]
pub struct DescentRequest {
    pub features: Vec<String>,
    pub output: String,
    /// Constant first. `None` uses [`default_initial_weights`].
    pub initial_weights: Option<Vec<f64>>,
    pub options: GradientDescentOptions,
}

/// `polyridge fit`: train on one file, optionally score another.
pub fn run_poly_fit(train: &Path, valid: Option<&Path>, options: &PolyFitOptions) -> Result<PolyFit, AppError> {
    let train_table = load_sales(train)?;
    let valid_table = valid.map(load_sales).transpose()?;
    fit_poly_model(&train_table, valid_table.as_ref(), options)
}

/// `polyridge descend`: load one file and run gradient descent on it.
pub fn run_gradient_descent(data: &Path, request: &DescentRequest) -> Result<GradientDescentFit, AppError> {
    let table = load_sales(data)?;
    gradient_descent_on_table(&table, request)
}

pub fn gradient_descent_on_table(table: &RecordTable, request: &DescentRequest) -> Result<GradientDescentFit, AppError> {
    if request.features.is_empty() {
        return Err(AppError::InvalidArgument("at least one feature column is required".to_string()));
    }
    let features: Vec<&str> = request.features.iter().map(String::as_str).collect();
    let (matrix, output) = design_matrix(table, &features, &request.output)?;

    let initial = match &request.initial_weights {
        Some(w) => DVector::from_column_slice(w),
        None => DVector::from_vec(default_initial_weights(features.len())),
    };

    let descent = regression_gradient_descent(&matrix, &output, &initial, &request.options)?;
    let rss = residual_sum_squares(&output, &predict_outcome(&matrix, &descent.weights));

    Ok(GradientDescentFit {
        columns: design_columns(&features),
        weights: descent.weights.iter().copied().collect(),
        iterations: descent.iterations,
        gradient_magnitude: descent.gradient_magnitude,
        rss,
    })
}

/// Starting point for sales-scale data: `[-47000, 1]` for one feature,
/// `[-100000, 1, ..., 1]` for several.
///
/// With the default step size the intercept barely moves per iteration, so it
/// has to start close to its optimum for the full gradient to drop below the
/// default tolerance.
pub fn default_initial_weights(features: usize) -> Vec<f64> {
    let intercept = if features == 1 { -47_000.0 } else { -100_000.0 };
    std::iter::once(intercept).chain(std::iter::repeat_n(1.0, features)).collect()
}

/// `polyridge subsets`: fit each file independently with the same options.
pub fn run_subsets(paths: &[PathBuf], options: &PolyFitOptions) -> Result<SubsetReport, AppError> {
    let mut subsets = Vec::with_capacity(paths.len());
    for (name, path) in subset_names(paths).into_iter().zip(paths) {
        subsets.push((name, load_sales(path)?));
    }
    info!(subsets = subsets.len(), degree = options.degree, "fitting subsets");
    fit_subsets(&subsets, options)
}

/// One distinct name per path. Repeated stems get `_2`, `_3`, ... in input order.
pub fn subset_names(paths: &[PathBuf]) -> Vec<String> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let stem = subset_name(path);
            let mut name = stem.clone();
            let mut k = 2;
            while !seen.insert(name.clone()) {
                name = format!("{stem}_{k}");
                k += 1;
            }
            name
        })
        .collect()
}

/// File stem, falling back to the full path.
pub fn subset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_names_use_file_stems() {
        assert_eq!(subset_name(Path::new("data/wk3_kc_house_set_1_data.csv")), "wk3_kc_house_set_1_data");
        assert_eq!(subset_name(Path::new("set_2")), "set_2");
    }

    #[test]
    fn repeated_stems_get_distinct_names() {
        let paths = [
            PathBuf::from("2014/set_1.csv"),
            PathBuf::from("2015/set_1.csv"),
            PathBuf::from("set_1_2.csv"),
            PathBuf::from("other/set_1.csv"),
        ];
        assert_eq!(subset_names(&paths), vec!["set_1", "set_1_2", "set_1_2_2", "set_1_3"]);
    }

    #[test]
    fn gradient_descent_recovers_exact_line() {
        // price = 1 + 2 * sqft_living, well conditioned enough for a large step.
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 1.0 + 2.0 * v).collect();
        let table = RecordTable::from_columns(&[("sqft_living", &x[..]), ("price", &y[..])]).unwrap();

        let request = DescentRequest {
            features: vec!["sqft_living".to_string()],
            output: "price".to_string(),
            initial_weights: Some(vec![0.0, 0.0]),
            options: GradientDescentOptions {
                step_size: 0.01,
                tolerance: 1e-6,
                max_iterations: 100_000,
            },
        };
        let fit = gradient_descent_on_table(&table, &request).unwrap();

        assert_eq!(fit.columns, vec!["constant".to_string(), "sqft_living".to_string()]);
        assert!((fit.weights[0] - 1.0).abs() < 1e-4);
        assert!((fit.weights[1] - 2.0).abs() < 1e-4);
        assert!(fit.rss < 1e-6);
    }

    #[test]
    fn default_weights_converge_on_sales_scale_data() {
        use rand::prelude::*;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(3);
        let sqft: Vec<f64> = (0..2000).map(|_| rng.gen_range(500.0..3700.0)).collect();
        let price: Vec<f64> = sqft
            .iter()
            .map(|s| -47_000.0 + 281.0 * s + rng.gen_range(-50_000.0..50_000.0))
            .collect();
        let table = RecordTable::from_columns(&[("sqft_living", &sqft[..]), ("price", &price[..])]).unwrap();

        let request = DescentRequest {
            features: vec!["sqft_living".to_string()],
            output: "price".to_string(),
            initial_weights: None,
            options: GradientDescentOptions::default(),
        };
        let fit = gradient_descent_on_table(&table, &request).unwrap();

        assert!(fit.gradient_magnitude < 2.5e7);
        assert!(fit.iterations < 1_000);
        assert!((fit.weights[0] + 47_000.0).abs() < 100.0);
        assert!((fit.weights[1] - 281.0).abs() < 5.0);
    }

    #[test]
    fn default_weights_match_feature_count() {
        assert_eq!(default_initial_weights(1), vec![-47_000.0, 1.0]);
        assert_eq!(default_initial_weights(2), vec![-100_000.0, 1.0, 1.0]);
    }

    #[test]
    fn gradient_descent_rejects_weight_count_mismatch() {
        let x = [1.0, 2.0];
        let table = RecordTable::from_columns(&[("sqft_living", &x[..]), ("price", &x[..])]).unwrap();
        let request = DescentRequest {
            features: vec!["sqft_living".to_string()],
            output: "price".to_string(),
            initial_weights: Some(vec![0.0]),
            options: GradientDescentOptions::default(),
        };
        let err = gradient_descent_on_table(&table, &request).unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));
    }

    #[test]
    fn missing_training_file_is_an_io_error() {
        let err = run_poly_fit(Path::new("/nonexistent/polyridge/train.csv"), None, &PolyFitOptions::default())
            .unwrap_err();
        assert!(matches!(err, AppError::Io { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
