//! Fit the same polynomial model independently on several data subsets.
//!
//! High-degree fits with a tiny penalty are very sensitive to which rows they
//! see; comparing the `power_1` coefficient across disjoint subsets makes that
//! variance visible.

use tracing::info;

use crate::domain::{RecordTable, SubsetFit, SubsetReport};
use crate::error::AppError;
use crate::fit::poly_fit::{PolyFitOptions, fit_poly_model};

/// Fit every `(name, table)` pair with the same options.
pub fn fit_subsets(subsets: &[(String, RecordTable)], options: &PolyFitOptions) -> Result<SubsetReport, AppError> {
    if subsets.is_empty() {
        return Err(AppError::InvalidArgument("no subsets to fit".to_string()));
    }

    let mut fits = Vec::with_capacity(subsets.len());
    for (name, table) in subsets {
        let fit = fit_poly_model(table, None, options)?;
        fits.push(SubsetFit {
            name: name.clone(),
            rows: table.len(),
            fit,
        });
    }

    let power_1 = |f: &SubsetFit| (f.name.clone(), f.fit.coefficient(1).unwrap_or(f64::NAN));
    let mut min_power_1 = power_1(&fits[0]);
    let mut max_power_1 = min_power_1.clone();
    for f in &fits[1..] {
        let (name, value) = power_1(f);
        if value < min_power_1.1 {
            min_power_1 = (name.clone(), value);
        }
        if value > max_power_1.1 {
            max_power_1 = (name, value);
        }
    }

    info!(
        subsets = fits.len(),
        min_power_1 = min_power_1.1,
        max_power_1 = max_power_1.1,
        "subset fits done"
    );

    Ok(SubsetReport {
        fits,
        min_power_1,
        max_power_1,
    })
}
