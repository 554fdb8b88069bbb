//! Shared domain types.
//!
//! These types are kept lightweight and serializable so fit results can be:
//!
//! - inspected in-memory by library callers
//! - printed as plain-text reports
//! - emitted as JSON (`--json`)

use std::collections::HashMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Declared type of a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Int,
    Float,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text => write!(f, "text"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::Float => write!(f, "float"),
        }
    }
}

/// A single typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Value {
    /// Numeric view of the cell. Text is never numeric, even if it looks like a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(_) => None,
        }
    }
}

/// Column name -> declared type.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: HashMap<String, ColumnType>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column types of the King County house-sales exports.
    pub fn house_sales() -> Self {
        use ColumnType::{Float, Int, Text};

        const COLUMNS: [(&str, ColumnType); 21] = [
            ("bathrooms", Float),
            ("waterfront", Int),
            ("sqft_above", Int),
            ("sqft_living15", Float),
            ("grade", Int),
            ("yr_renovated", Int),
            ("price", Float),
            ("bedrooms", Float),
            ("zipcode", Text),
            ("long", Float),
            ("sqft_lot15", Float),
            ("sqft_living", Float),
            ("floors", Float),
            ("condition", Int),
            ("lat", Float),
            ("date", Text),
            ("sqft_basement", Int),
            ("yr_built", Int),
            ("id", Text),
            ("sqft_lot", Int),
            ("view", Int),
        ];

        COLUMNS
            .iter()
            .fold(Self::new(), |schema, &(name, ty)| schema.with_column(name, ty))
    }

    pub fn with_column(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.columns.insert(name.into(), ty);
        self
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(name).copied()
    }
}

/// Colors accepted for charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlotColor {
    Black,
    Blue,
    Green,
    Red,
    Orange,
    Purple,
    Cyan,
    Magenta,
}

/// Optional plotting controls for a polynomial fit.
///
/// Colors left as `None` fall back to blue points and a red line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub scatter_color: Option<PlotColor>,
    pub line_color: Option<PlotColor>,
    /// Terminal plot size (columns x rows).
    pub width: usize,
    pub height: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            scatter_color: None,
            line_color: None,
            width: 100,
            height: 25,
        }
    }
}

impl PlotConfig {
    pub fn scatter_color(&self) -> PlotColor {
        self.scatter_color.unwrap_or(PlotColor::Blue)
    }

    pub fn line_color(&self) -> PlotColor {
        self.line_color.unwrap_or(PlotColor::Red)
    }
}

/// The data a chart of a polynomial fit is drawn from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSeries {
    /// The source feature (`power_1`).
    pub x: Vec<f64>,
    /// Observed target values.
    pub y: Vec<f64>,
    /// Model predictions at `x`.
    pub y_fit: Vec<f64>,
    pub config: PlotConfig,
}

/// Output of a polynomial ridge fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolyFit {
    pub degree: usize,
    pub feature: String,
    pub output: String,
    pub l2_penalty: f64,
    pub normalize: bool,
    /// `[intercept, power_1, ..., power_degree]`.
    pub weights: Vec<f64>,
    pub train_rss: f64,
    /// `None` when no validation table was supplied.
    pub validation_rss: Option<f64>,
    /// Present only when plotting was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<FitSeries>,
}

impl PolyFit {
    pub fn intercept(&self) -> f64 {
        self.weights[0]
    }

    /// Coefficient of `power_k` (1-based), if the model has that term.
    pub fn coefficient(&self, power: usize) -> Option<f64> {
        if power == 0 {
            return None;
        }
        self.weights.get(power).copied()
    }
}

/// Output of gradient-descent least squares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientDescentFit {
    /// Names of the design-matrix columns, `constant` first.
    pub columns: Vec<String>,
    pub weights: Vec<f64>,
    pub iterations: usize,
    pub gradient_magnitude: f64,
    pub rss: f64,
}

/// One subset's fit inside a multi-subset run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsetFit {
    pub name: String,
    pub rows: usize,
    pub fit: PolyFit,
}

/// Result of fitting the same model independently on several subsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsetReport {
    pub fits: Vec<SubsetFit>,
    /// `(subset name, coefficient)` with the smallest `power_1` coefficient.
    pub min_power_1: (String, f64),
    /// `(subset name, coefficient)` with the largest `power_1` coefficient.
    pub max_power_1: (String, f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_sales_schema_types() {
        let schema = Schema::house_sales();
        assert_eq!(schema.column_type("price"), Some(ColumnType::Float));
        assert_eq!(schema.column_type("date"), Some(ColumnType::Text));
        assert_eq!(schema.column_type("sqft_living"), Some(ColumnType::Float));
        assert_eq!(schema.column_type("zipcode"), Some(ColumnType::Text));
        assert_eq!(schema.column_type("yr_built"), Some(ColumnType::Int));
        assert_eq!(schema.column_type("nope"), None);
    }

    #[test]
    fn text_values_are_not_numeric() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Text("98178".to_string()).as_f64(), None);
    }

    #[test]
    fn plot_config_default_colors() {
        let config = PlotConfig::default();
        assert_eq!(config.scatter_color(), PlotColor::Blue);
        assert_eq!(config.line_color(), PlotColor::Red);
    }
}
