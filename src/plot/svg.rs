//! Plotters-powered SVG chart of a polynomial fit.
//!
//! The chart is a scatter of the observations with the fitted curve drawn on
//! top. No axis labels are rendered: text layout would need a font backend,
//! and the ASCII plot already prints the ranges.

use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::domain::{FitSeries, PlotColor};
use crate::error::AppError;

/// Default SVG size in pixels.
pub const SVG_SIZE: (u32, u32) = (800, 600);

/// A render-only chart description.
///
/// All series and bounds are computed up front by [`FitChart::from_series`],
/// which keeps [`FitChart::render_svg`] focused on drawing.
pub struct FitChart<'a> {
    /// Fitted curve, sorted by x.
    pub curve: Vec<(f64, f64)>,
    /// Observations.
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub scatter_color: RGBColor,
    pub line_color: RGBColor,
    pub series: &'a FitSeries,
}

impl<'a> FitChart<'a> {
    pub fn from_series(series: &'a FitSeries) -> Result<Self, AppError> {
        let points: Vec<(f64, f64)> = finite_pairs(&series.x, &series.y);
        let mut curve: Vec<(f64, f64)> = finite_pairs(&series.x, &series.y_fit);
        curve.sort_by(|a, b| a.0.total_cmp(&b.0));

        let x_bounds = bounds(points.iter().map(|p| p.0))
            .ok_or_else(|| AppError::Plot("need at least two distinct x values to plot".to_string()))?;
        let y_bounds = bounds(points.iter().chain(curve.iter()).map(|p| p.1))
            .ok_or_else(|| AppError::Plot("need at least two distinct y values to plot".to_string()))?;

        Ok(Self {
            curve,
            points,
            x_bounds,
            y_bounds,
            scatter_color: rgb(series.config.scatter_color()),
            line_color: rgb(series.config.line_color()),
            series,
        })
    }

    pub fn render_svg(&self, path: &Path, size: (u32, u32)) -> Result<(), AppError> {
        let root = SVGBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(plot_error)?;

        chart
            .draw_series(
                self.points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 2, self.scatter_color.filled())),
            )
            .map_err(plot_error)?;
        chart
            .draw_series(LineSeries::new(self.curve.iter().copied(), &self.line_color))
            .map_err(plot_error)?;

        root.present().map_err(plot_error)?;
        info!(path = %path.display(), points = self.series.x.len(), "wrote SVG chart");
        Ok(())
    }
}

/// Render `series` to an SVG file at the default size.
pub fn render_svg_plot(series: &FitSeries, path: &Path) -> Result<(), AppError> {
    FitChart::from_series(series)?.render_svg(path, SVG_SIZE)
}

fn rgb(color: PlotColor) -> RGBColor {
    match color {
        PlotColor::Black => BLACK,
        PlotColor::Blue => BLUE,
        PlotColor::Green => GREEN,
        PlotColor::Red => RED,
        PlotColor::Orange => RGBColor(255, 165, 0),
        PlotColor::Purple => RGBColor(128, 0, 128),
        PlotColor::Cyan => CYAN,
        PlotColor::Magenta => MAGENTA,
    }
}

fn finite_pairs(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter()
        .copied()
        .zip(y.iter().copied())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .collect()
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<[f64; 2]> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(min.is_finite() && max.is_finite()) || max <= min {
        return None;
    }
    let pad = (max - min) * 0.05;
    Some([min - pad, max + pad])
}

fn plot_error(e: impl std::fmt::Display) -> AppError {
    AppError::Plot(e.to_string())
}
