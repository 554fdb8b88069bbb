//! Command-line parsing for the polynomial ridge explorer.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! modeling/math code. Arguments are turned into plain option structs in
//! `crate::app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::PlotColor;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "polyridge",
    version,
    about = "Polynomial ridge regression over house-sales CSV exports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a polynomial ridge model on a training CSV, optionally scoring a validation CSV.
    Fit(FitArgs),
    /// Fit least squares by gradient descent over one or more feature columns.
    Descend(DescendArgs),
    /// Fit the same polynomial ridge model independently on several CSV subsets.
    Subsets(SubsetsArgs),
}

/// Model options shared by `fit` and `subsets`.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Column expanded into polynomial features.
    #[arg(long, default_value = "sqft_living")]
    pub feature: String,

    /// Target column.
    #[arg(long, default_value = "price")]
    pub output: String,

    /// L2 penalty (ridge alpha).
    #[arg(long = "l2-penalty", default_value_t = 1e-9)]
    pub l2_penalty: f64,

    /// Fit on raw (centered but unscaled) polynomial columns.
    #[arg(long)]
    pub no_normalize: bool,
}

/// Plot options shared by `fit` and `subsets`.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Print an ASCII plot of the data and fitted curve.
    #[arg(long)]
    pub plot: bool,

    /// Write an SVG chart (`fit`: file path, `subsets`: output directory).
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// Color of the observation points in SVG charts.
    #[arg(long, value_enum)]
    pub scatter_color: Option<PlotColor>,

    /// Color of the fitted curve in SVG charts.
    #[arg(long, value_enum)]
    pub line_color: Option<PlotColor>,

    /// ASCII plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// ASCII plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Training CSV.
    #[arg(long, value_name = "CSV")]
    pub train: PathBuf,

    /// Validation CSV scored with the model fit on `--train`.
    #[arg(long, value_name = "CSV")]
    pub valid: Option<PathBuf>,

    /// Polynomial degree.
    #[arg(short = 'd', long, default_value_t = 1)]
    pub degree: usize,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub plot: PlotArgs,

    /// Print results as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct DescendArgs {
    /// Input CSV.
    #[arg(long, value_name = "CSV")]
    pub data: PathBuf,

    /// Feature columns (comma separated); a constant column is always prepended.
    #[arg(long, value_delimiter = ',', default_value = "sqft_living")]
    pub features: Vec<String>,

    /// Target column.
    #[arg(long, default_value = "price")]
    pub output: String,

    /// Starting weights, constant first (comma separated).
    ///
    /// Defaults to `-47000,1` for a single feature and `-100000,1,...,1` otherwise.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub initial_weights: Option<Vec<f64>>,

    #[arg(long, default_value_t = 7e-12)]
    pub step_size: f64,

    /// Stop once the gradient magnitude is below this.
    #[arg(long, default_value_t = 2.5e7)]
    pub tolerance: f64,

    /// Give up after this many iterations.
    #[arg(long, default_value_t = 100_000)]
    pub max_iterations: usize,

    /// Print results as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct SubsetsArgs {
    /// Subset CSVs, each fit independently.
    #[arg(required = true, value_name = "CSV")]
    pub sets: Vec<PathBuf>,

    /// Polynomial degree.
    #[arg(short = 'd', long, default_value_t = 15)]
    pub degree: usize,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub plot: PlotArgs,

    /// Print results as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}
