//! Track candidates and reconstructed tracks.

use crate::geometry::WIRE_COUNT;
use crate::line::{Line2, Point2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw times behind the four points of a track, in wire order.
pub type TrackTimes = [u32; WIRE_COUNT];

/// A fitted sign assignment for one hit combination.
///
/// `points[i]` always belongs to wire `i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackCandidate {
    /// One point per wire.
    pub points: [Point2; WIRE_COUNT],
    /// Least-squares line through `points`.
    pub line: Line2,
    /// Sum of squared residuals of `line` against `points`.
    pub deviation: f64,
    /// Raw times that produced `points`.
    pub times: TrackTimes,
    /// Sign pattern that produced `points` (bit `i` set: wire `i` negated).
    pub signs: u8,
}

/// A reconstructed, systematic-corrected track.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackDescription {
    /// Fitted track line.
    pub line: Line2,
    /// Corrected points the line was fitted through, one per wire.
    pub points: [Point2; WIRE_COUNT],
    /// Sum of squared residuals, never negative.
    pub deviation: f64,
    /// TDC times the points were built from.
    pub times: TrackTimes,
}

impl TrackDescription {
    /// Creates a track description.
    #[must_use]
    pub fn new(
        line: Line2,
        points: [Point2; WIRE_COUNT],
        deviation: f64,
        times: TrackTimes,
    ) -> Self {
        Self {
            line,
            points,
            deviation,
            times,
        }
    }

    /// Track inclination against the chamber axis, in radians.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.line.angle()
    }
}

impl From<TrackCandidate> for TrackDescription {
    fn from(candidate: TrackCandidate) -> Self {
        Self::new(
            candidate.line,
            candidate.points,
            candidate.deviation,
            candidate.times,
        )
    }
}
