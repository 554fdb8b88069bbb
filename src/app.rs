//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs the tracing subscriber
//! - parses CLI arguments into option structs
//! - runs the fit pipeline for the chosen subcommand
//! - prints text or JSON reports and optional plots

use std::path::Path;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::cli::{Command, DescendArgs, FitArgs, ModelArgs, PlotArgs, SubsetsArgs};
use crate::domain::{PlotConfig, PolyFit};
use crate::error::AppError;
use crate::fit::PolyFitOptions;
use crate::math::GradientDescentOptions;

pub mod pipeline;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "POLY_RIDGE_LOG";
const DEFAULT_LOG_FILTER: &str = "poly_ridge=warn";

/// Entry point for the `polyridge` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing()?;
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Descend(args) => handle_descend(args),
        Command::Subsets(args) => handle_subsets(args),
    }
}

/// Log to stderr so stdout stays clean for reports and `--json`.
pub fn init_tracing() -> Result<(), AppError> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .map_err(|e| AppError::InvalidArgument(format!("bad {LOG_ENV} filter: {e}")))?;
    let format_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(format_layer)
        .try_init()
        .map_err(|e| AppError::InvalidArgument(format!("tracing already initialised: {e}")))
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let options = poly_options_from_args(args.degree, &args.model, &args.plot);
    let fit = pipeline::run_poly_fit(&args.train, args.valid.as_deref(), &options)?;

    if args.json {
        println!("{}", crate::report::to_json(&fit)?);
    } else {
        println!("{}", crate::report::format_poly_fit(&fit));
    }

    render_plots(&fit, args.plot.plot && !args.json, args.plot.svg.as_deref())
}

fn handle_descend(args: DescendArgs) -> Result<(), AppError> {
    let request = descent_request_from_args(&args);
    let fit = pipeline::run_gradient_descent(&args.data, &request)?;

    if args.json {
        println!("{}", crate::report::to_json(&fit)?);
    } else {
        println!("{}", crate::report::format_gradient_descent(&fit));
    }
    Ok(())
}

fn handle_subsets(args: SubsetsArgs) -> Result<(), AppError> {
    let options = poly_options_from_args(args.degree, &args.model, &args.plot);
    let report = pipeline::run_subsets(&args.sets, &options)?;

    if args.json {
        println!("{}", crate::report::to_json(&report)?);
    } else {
        println!("{}", crate::report::format_subset_report(&report));
    }

    if let Some(dir) = &args.plot.svg {
        std::fs::create_dir_all(dir).map_err(|source| AppError::Io {
            action: "create directory",
            path: dir.clone(),
            source,
        })?;
    }
    for subset in &report.fits {
        if args.plot.plot && !args.json {
            println!("--- {} ---", subset.name);
        }
        let svg_path = args.plot.svg.as_ref().map(|dir| dir.join(format!("{}.svg", subset.name)));
        render_plots(&subset.fit, args.plot.plot && !args.json, svg_path.as_deref())?;
    }
    Ok(())
}

/// ASCII plot to stdout and/or an SVG file.
fn render_plots(fit: &PolyFit, ascii: bool, svg_path: Option<&Path>) -> Result<(), AppError> {
    let Some(series) = &fit.series else {
        return Ok(());
    };
    if ascii {
        println!(
            "{}",
            crate::plot::render_ascii_plot(series, series.config.width, series.config.height)
        );
    }
    if let Some(path) = svg_path {
        crate::plot::render_svg_plot(series, path)?;
    }
    Ok(())
}

/// Plotting is requested by `--plot` or `--svg`; otherwise the fit carries no series.
pub fn poly_options_from_args(degree: usize, model: &ModelArgs, plot: &PlotArgs) -> PolyFitOptions {
    let wants_plot = plot.plot || plot.svg.is_some();
    PolyFitOptions {
        degree,
        feature: model.feature.clone(),
        output: model.output.clone(),
        l2_penalty: model.l2_penalty,
        normalize: !model.no_normalize,
        plot: wants_plot.then(|| PlotConfig {
            scatter_color: plot.scatter_color,
            line_color: plot.line_color,
            width: plot.width,
            height: plot.height,
        }),
    }
}

pub fn descent_request_from_args(args: &DescendArgs) -> pipeline::DescentRequest {
    pipeline::DescentRequest {
        features: args.features.iter().map(|f| f.trim().to_string()).collect(),
        output: args.output.clone(),
        initial_weights: args.initial_weights.clone(),
        options: GradientDescentOptions {
            step_size: args.step_size,
            tolerance: args.tolerance,
            max_iterations: args.max_iterations,
        },
    }
}
