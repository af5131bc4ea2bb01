//! Planar points, lines, and the least-squares line fit.
#![allow(clippy::cast_precision_loss)]

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default threshold below which the fit denominator counts as degenerate.
pub const DEGENERACY_EPSILON: f64 = 1e-60;

/// A point in the chamber plane: x longitudinal, y transverse.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line2 {
    pub slope: f64,
    pub intercept: f64,
}

impl Line2 {
    /// Creates a new line.
    #[inline]
    #[must_use]
    pub const fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Evaluates the line at `x`.
    #[inline]
    #[must_use]
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Inclination against the x axis, in radians.
    #[inline]
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.slope.atan()
    }
}

/// Result of a line fit: the line and its sum of squared residuals.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineFit {
    pub line: Line2,
    pub deviation: f64,
}

/// Fits a line through `points` by ordinary least squares.
///
/// Uses the default degeneracy threshold, see [`least_squares`].
///
/// # Errors
/// See [`least_squares`].
pub fn fit_line(points: &[Point2]) -> Result<LineFit> {
    least_squares(points, DEGENERACY_EPSILON)
}

/// Fits a line through `points` by ordinary least squares.
///
/// The deviation is the sum of squared residuals `(k*x + b - y)^2`.
///
/// # Errors
/// - `TooFewPoints` for fewer than two points.
/// - `Unfittable` when `|n*Sxx - Sx^2|` is zero, not a number, or not above `epsilon`.
pub fn least_squares(points: &[Point2], epsilon: f64) -> Result<LineFit> {
    if points.len() < 2 {
        return Err(Error::TooFewPoints(points.len()));
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for p in points {
        sum_x += p.x;
        sum_y += p.y;
        sum_xy += p.x * p.y;
        sum_xx += p.x * p.x;
    }

    let n = points.len() as f64;
    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.is_nan() || denominator.abs() <= epsilon {
        return Err(Error::Unfittable { denominator });
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    let line = Line2::new(slope, intercept);

    let deviation = points
        .iter()
        .map(|p| {
            let residual = line.y_at(p.x) - p.y;
            residual * residual
        })
        .sum();

    Ok(LineFit { line, deviation })
}
