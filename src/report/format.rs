//! Plain-text formatting of fit results.
//!
//! Formatting lives in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{GradientDescentFit, PolyFit, SubsetReport};

/// Summary of a single polynomial ridge fit.
pub fn format_poly_fit(fit: &PolyFit) -> String {
    let mut out = String::new();

    out.push_str("=== polyridge - polynomial ridge fit ===\n");
    out.push_str(&format!(
        "Model: {} ~ poly({}, {}) | l2_penalty={:e} | normalize={}\n",
        fit.output, fit.feature, fit.degree, fit.l2_penalty, fit.normalize
    ));
    out.push_str(&format!("Train RSS: {:.6e}\n", fit.train_rss));
    match fit.validation_rss {
        Some(rss) => out.push_str(&format!("Validation RSS: {rss:.6e}\n")),
        None => out.push_str("Validation RSS: (no validation set)\n"),
    }

    out.push_str("\nWeights:\n");
    out.push_str(&format_weight_table(&poly_weight_names(fit.degree), &fit.weights));
    out
}

/// Summary of a gradient-descent least squares run.
pub fn format_gradient_descent(fit: &GradientDescentFit) -> String {
    let mut out = String::new();

    out.push_str("=== polyridge - gradient descent ===\n");
    out.push_str(&format!(
        "Converged: iterations={} | gradient magnitude={:.6e}\n",
        fit.iterations, fit.gradient_magnitude
    ));
    out.push_str(&format!("RSS: {:.6e}\n", fit.rss));

    out.push_str("\nWeights:\n");
    out.push_str(&format_weight_table(&fit.columns, &fit.weights));
    out
}

/// Per-subset coefficients plus the `power_1` extremes.
pub fn format_subset_report(report: &SubsetReport) -> String {
    let mut out = String::new();

    out.push_str("=== polyridge - subset fits ===\n");
    if let Some(first) = report.fits.first() {
        out.push_str(&format!(
            "Model: {} ~ poly({}, {}) | l2_penalty={:e} | normalize={}\n",
            first.fit.output, first.fit.feature, first.fit.degree, first.fit.l2_penalty, first.fit.normalize
        ));
    }

    out.push('\n');
    out.push_str(
        format!("{:<24} {:>8} {:>16} {:>16} {:>16}", "subset", "rows", "intercept", "power_1", "train_rss").trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<24} {:-<8} {:-<16} {:-<16} {:-<16}", "", "", "", "", "").trim_end());
    out.push('\n');
    for s in &report.fits {
        out.push_str(
            format!(
                "{:<24} {:>8} {:>16.6e} {:>16.6e} {:>16.6e}",
                truncate(&s.name, 24),
                s.rows,
                s.fit.intercept(),
                s.fit.coefficient(1).unwrap_or(f64::NAN),
                s.fit.train_rss,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push_str(&format!(
        "\nSmallest power_1: {:.6e} ({})\n",
        report.min_power_1.1, report.min_power_1.0
    ));
    out.push_str(&format!(
        "Largest power_1:  {:.6e} ({})\n",
        report.max_power_1.1, report.max_power_1.0
    ));
    out
}

fn poly_weight_names(degree: usize) -> Vec<String> {
    std::iter::once("intercept".to_string())
        .chain((1..=degree).map(|k| format!("power_{k}")))
        .collect()
}

fn format_weight_table(names: &[String], weights: &[f64]) -> String {
    let mut out = String::new();
    for (name, w) in names.iter().zip(weights.iter()) {
        out.push_str(&format!("  {:<16} {:>16.8e}\n", name, w));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
