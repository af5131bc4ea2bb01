//! Chamber geometry: sense wires and chamber placement.

use crate::calibration::ChamberCalibration;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of sense wires (detector planes) in a chamber.
pub const WIRE_COUNT: usize = 4;

/// Fixed sense-wire layout, indexed by wire number.
///
/// Wire `i` always maps to the same physical plane; the transverse offsets
/// alternate in sign so neighbouring wires are staggered about the centerline.
pub const WIRES: [Wire; WIRE_COUNT] = [
    Wire::new(41.0, 0.75),
    Wire::new(51.0, -0.75),
    Wire::new(61.0, 0.75),
    Wire::new(71.0, -0.75),
];

/// A sense wire: longitudinal position and nominal transverse offset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wire {
    /// Longitudinal coordinate (x of every point measured on this wire).
    pub position: f64,
    /// Nominal transverse offset from the chamber centerline.
    pub offset: f64,
}

impl Wire {
    /// Creates a new wire.
    #[inline]
    #[must_use]
    pub const fn new(position: f64, offset: f64) -> Self {
        Self { position, offset }
    }

    /// Side of the centerline the wire sits on: `1`, `-1`, or `0`.
    #[inline]
    #[must_use]
    pub fn side(&self) -> i8 {
        sign(self.offset)
    }
}

/// Three-valued sign: `1` for positive, `-1` for negative, `0` for zero and NaN.
#[inline]
#[must_use]
pub fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// A point in the experimental hall frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Placement and calibration of one chamber in the setup.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChamberDescription {
    /// Reference points locating the chamber frame in the hall.
    pub points: [Vec3; 3],
    /// Per-wire calibration.
    pub calibration: ChamberCalibration,
    /// Detector plane the chamber belongs to.
    pub plane: u32,
    /// Chamber group within the plane.
    pub group: u32,
}

impl ChamberDescription {
    /// Creates a chamber description.
    #[must_use]
    pub fn new(points: [Vec3; 3], calibration: ChamberCalibration, plane: u32, group: u32) -> Self {
        Self {
            points,
            calibration,
            plane,
            group,
        }
    }

    /// Replaces the chamber calibration.
    pub fn set_calibration(&mut self, calibration: ChamberCalibration) {
        self.calibration = calibration;
    }
}

/// Chambers of a setup keyed by chamber id.
pub type ChamberSet = HashMap<u64, ChamberDescription>;
