//! Raw time to drift distance conversion.

use trek_core::calibration::ChamberCalibration;
use trek_core::hit::{DistanceCandidate, DistanceSet, RawHitSet};

/// Converts every raw hit time of an event into a drift distance.
///
/// Times at or before a wire's time-zero offset are dropped. Surviving
/// candidates keep their raw-time order and carry the time they came from.
#[must_use]
pub fn convert_times(hits: &RawHitSet, calibration: &ChamberCalibration) -> DistanceSet {
    let wires = std::array::from_fn(|wire| {
        let params = calibration.wire(wire);
        hits.wire(wire)
            .iter()
            .filter_map(|&time| {
                params
                    .drift_distance(time)
                    .map(|distance| DistanceCandidate::new(distance, time))
            })
            .collect()
    });
    DistanceSet::new(wires)
}
