//! Angle-dependent systematic correction of track points.
//!
//! At non-normal incidence the drift path to a wire is longer than the
//! transverse distance the fit sees. Each point `y` moves by
//! `sign(y) * r * (sec(theta) - 1)`, where `theta` is the inclination of the
//! previous fit. `r` is `y` itself while `|y|` is within the cell limit for the
//! point's side of the wire, and the limit once it is exceeded.

use log::trace;
use trek_core::config::ReconstructionConfig;
use trek_core::error::{Error, Result};
use trek_core::geometry::{sign, Wire, WIRE_COUNT};
use trek_core::line::least_squares;
use trek_core::track::TrackCandidate;

/// Path lengthening of a drift distance `r` at inclination `angle` (radians).
#[inline]
#[must_use]
pub fn systematic_shift(r: f64, angle: f64) -> f64 {
    r * (1.0 / angle.cos() - 1.0)
}

/// Cell limit for a point on side `point_side` of a wire on side `wire_side`.
///
/// Returns `None` when either side is zero.
#[inline]
#[must_use]
pub fn drift_limit(point_side: i8, wire_side: i8, config: &ReconstructionConfig) -> Option<f64> {
    match point_side * wire_side {
        1 => Some(config.near_clamp),
        -1 => Some(config.far_clamp),
        _ => None,
    }
}

/// Corrects every point of `candidate` and refits.
///
/// # Errors
/// - `AmbiguousSide` if a point lies exactly on the centerline.
/// - `Unfittable` if the corrected points cannot be fitted.
pub fn correct(
    candidate: &TrackCandidate,
    wires: &[Wire; WIRE_COUNT],
    config: &ReconstructionConfig,
) -> Result<TrackCandidate> {
    let angle = candidate.line.angle();
    let mut corrected = *candidate;

    for (wire, (point, geometry)) in corrected.points.iter_mut().zip(wires).enumerate() {
        let side = sign(point.y);
        let limit = drift_limit(side, geometry.side(), config)
            .ok_or(Error::AmbiguousSide { wire })?;
        // Clamped points take the limit with a positive sign; unclamped ones keep their own.
        let r = if point.y.abs() > limit { limit } else { point.y };
        point.y += f64::from(side) * systematic_shift(r, angle);
    }

    let fit = least_squares(&corrected.points, config.degeneracy_epsilon)?;
    trace!(
        "corrected deviation {:.6} -> {:.6}",
        candidate.deviation,
        fit.deviation
    );
    corrected.line = fit.line;
    corrected.deviation = fit.deviation;
    Ok(corrected)
}
