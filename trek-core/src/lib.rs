//! trek-core: Core types for drift chamber track reconstruction.
//!
//! This crate provides the chamber geometry, per-wire calibration, hit and
//! distance containers, the least-squares line fit, and the track types
//! produced by reconstruction.
//!

pub mod calibration;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod line;
pub mod track;

pub use calibration::{ChamberCalibration, WireCalibration};
pub use config::ReconstructionConfig;
pub use error::{Error, Result};
pub use geometry::{sign, ChamberDescription, ChamberSet, Vec3, Wire, WIRES, WIRE_COUNT};
pub use hit::{DistanceCandidate, DistanceSet, RawHitSet};
pub use line::{fit_line, least_squares, Line2, LineFit, Point2};
pub use track::{TrackCandidate, TrackDescription, TrackTimes};
