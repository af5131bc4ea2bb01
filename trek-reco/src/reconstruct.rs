//! Track reconstruction for a single chamber event.

use log::{debug, trace};
use rayon::prelude::*;
use trek_core::calibration::ChamberCalibration;
use trek_core::config::ReconstructionConfig;
use trek_core::error::{Error, Result};
use trek_core::geometry::{Wire, WIRES, WIRE_COUNT};
use trek_core::hit::{DistanceSet, RawHitSet};
use trek_core::track::{TrackCandidate, TrackDescription};

use crate::correction::correct;
use crate::distance::convert_times;
use crate::selection::{check_eligibility, Combinations, HitSelection};
use crate::signs::resolve_signs;

/// Reconstructs straight tracks from four-wire hit sets.
///
/// The reconstructor is immutable and can be shared between threads; every
/// call works on its own buffers.
#[derive(Debug, Clone)]
pub struct ChamberReconstructor {
    config: ReconstructionConfig,
    wires: [Wire; WIRE_COUNT],
}

impl Default for ChamberReconstructor {
    fn default() -> Self {
        Self::new(ReconstructionConfig::default())
    }
}

impl ChamberReconstructor {
    /// Creates a reconstructor for the standard wire layout.
    #[must_use]
    pub fn new(config: ReconstructionConfig) -> Self {
        Self {
            config,
            wires: WIRES,
        }
    }

    /// Replaces the wire layout.
    #[must_use]
    pub fn with_wires(mut self, wires: [Wire; WIRE_COUNT]) -> Self {
        self.wires = wires;
        self
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Wire layout in use.
    #[must_use]
    pub fn wires(&self) -> &[Wire; WIRE_COUNT] {
        &self.wires
    }

    /// Reconstructs the best track of one event.
    ///
    /// Every hit combination is resolved for left/right ambiguity, corrected
    /// for incidence angle, and scored by its corrected deviation. The lowest
    /// deviation wins; on ties the first combination in odometer order wins.
    ///
    /// # Errors
    /// - `NoEligibleHits` if the smallest per-wire candidate count is not one.
    /// - `NoCandidate` if every combination was unfittable or ambiguous.
    pub fn reconstruct(
        &self,
        hits: &RawHitSet,
        calibration: &ChamberCalibration,
    ) -> Result<TrackDescription> {
        let distances = convert_times(hits, calibration);
        let combinations = check_eligibility(&distances).inspect_err(|err| {
            debug!("event rejected, counts {:?}: {err}", distances.counts());
        })?;

        let best = if self.config.parallel && combinations >= self.config.parallel_threshold {
            self.search_parallel(&distances)
        } else {
            self.search(&distances)
        };

        match best {
            Some(candidate) => {
                debug!(
                    "track k={:.5} b={:.4} dev={:.6} times={:?}",
                    candidate.line.slope,
                    candidate.line.intercept,
                    candidate.deviation,
                    candidate.times
                );
                Ok(candidate.into())
            }
            None => {
                debug!("no candidate among {combinations} combination(s)");
                Err(Error::NoCandidate { combinations })
            }
        }
    }

    fn evaluate(
        &self,
        distances: &DistanceSet,
        indices: &[usize; WIRE_COUNT],
    ) -> Option<TrackCandidate> {
        let selection = HitSelection::from_indices(distances, indices);
        let candidate = resolve_signs(&selection, &self.wires, self.config.degeneracy_epsilon)?;
        match correct(&candidate, &self.wires, &self.config) {
            Ok(corrected) => Some(corrected),
            Err(err) => {
                trace!("combination {indices:?} discarded: {err}");
                None
            }
        }
    }

    fn search(&self, distances: &DistanceSet) -> Option<TrackCandidate> {
        let mut best: Option<TrackCandidate> = None;
        for indices in Combinations::of(distances) {
            let Some(candidate) = self.evaluate(distances, &indices) else {
                continue;
            };
            let better = match &best {
                Some(current) => candidate.deviation < current.deviation,
                None => true,
            };
            if better {
                best = Some(candidate);
            }
        }
        best
    }

    fn search_parallel(&self, distances: &DistanceSet) -> Option<TrackCandidate> {
        let combinations: Vec<[usize; WIRE_COUNT]> = Combinations::of(distances).collect();
        combinations
            .par_iter()
            .enumerate()
            .filter_map(|(order, indices)| {
                self.evaluate(distances, indices)
                    .map(|candidate| (order, candidate))
            })
            .min_by(|(order_a, a), (order_b, b)| {
                a.deviation
                    .total_cmp(&b.deviation)
                    .then(order_a.cmp(order_b))
            })
            .map(|(_, candidate)| candidate)
    }
}

/// Reconstructs one event with the default configuration and wire layout.
///
/// # Errors
/// See [`ChamberReconstructor::reconstruct`].
pub fn reconstruct(hits: &RawHitSet, calibration: &ChamberCalibration) -> Result<TrackDescription> {
    ChamberReconstructor::default().reconstruct(hits, calibration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signs::{sign_variant, SIGN_PATTERNS};
    use approx::assert_relative_eq;
    use trek_core::line::fit_line;

    fn unit_calibration() -> ChamberCalibration {
        ChamberCalibration::uniform(0, 1.0)
    }

    #[test]
    fn test_all_wires_empty() {
        let result = reconstruct(&RawHitSet::default(), &unit_calibration());
        assert_eq!(result, Err(Error::NoEligibleHits { depth: 0 }));
    }

    #[test]
    fn test_filtered_wire_is_ineligible() {
        let calibration = ChamberCalibration::uniform(20, 1.0);
        let hits = RawHitSet::new([vec![30], vec![15], vec![40], vec![25]]);
        assert_eq!(
            reconstruct(&hits, &calibration),
            Err(Error::NoEligibleHits { depth: 0 })
        );
    }

    #[test]
    fn test_every_wire_ambiguous_is_rejected() {
        let hits = RawHitSet::new([vec![3, 4], vec![5, 6], vec![2, 7], vec![1, 8]]);
        assert_eq!(
            reconstruct(&hits, &unit_calibration()),
            Err(Error::NoEligibleHits { depth: 2 })
        );
    }

    #[test]
    fn test_equal_times_scenario() {
        let hits = RawHitSet::new([vec![10], vec![10], vec![10], vec![10]]);
        let track = reconstruct(&hits, &unit_calibration()).unwrap();

        assert_eq!(track.times, [10; WIRE_COUNT]);
        // All points on one side of the centerline.
        let above = track.points.iter().all(|p| p.y > 0.0);
        let below = track.points.iter().all(|p| p.y < 0.0);
        assert!(above || below);

        // Uncorrected zigzag scores 1.8; the correction widens it slightly.
        assert!(track.deviation > 1.8);
        assert!(track.deviation < 1.81);
        assert!(track.line.slope.abs() > 0.0);
        let refit = fit_line(&track.points).unwrap();
        assert_relative_eq!(refit.deviation, track.deviation, epsilon = 1e-12);
    }

    #[test]
    fn test_single_candidates_take_best_of_sixteen() {
        let hits = RawHitSet::new([vec![13], vec![4], vec![22], vec![9]]);
        let calibration = ChamberCalibration::uniform(2, 0.25);
        let reconstructor = ChamberReconstructor::default();
        let track = reconstructor.reconstruct(&hits, &calibration).unwrap();

        let distances = convert_times(&hits, &calibration);
        let selection = HitSelection::from_indices(&distances, &[0; WIRE_COUNT]);
        let best = resolve_signs(&selection, &WIRES, 1e-60).unwrap();
        for pattern in 0..SIGN_PATTERNS {
            let fit = fit_line(&sign_variant(&selection, &WIRES, pattern)).unwrap();
            assert!(best.deviation <= fit.deviation);
        }
        let expected = correct(&best, &WIRES, reconstructor.config()).unwrap();
        assert_eq!(track, TrackDescription::from(expected));
    }

    #[test]
    fn test_times_traced_through_filtering() {
        // Wire 1's first time is dropped, so the survivor index and raw index differ.
        let calibration = ChamberCalibration::uniform(5, 0.1);
        let hits = RawHitSet::new([vec![20], vec![3, 37, 62], vec![41], vec![57]]);
        let track = reconstruct(&hits, &calibration).unwrap();
        assert!(track.times[1] == 37 || track.times[1] == 62);
        assert_eq!(track.times[0], 20);
        assert_eq!(track.times[2], 41);
        assert_eq!(track.times[3], 57);
    }

    #[test]
    fn test_picks_combination_on_the_line() {
        // Track y = 0.05 x + 1; wire 2 carries a noise hit besides the real one.
        let line = |x: f64| 0.05 * x + 1.0;
        let times: [u32; WIRE_COUNT] = std::array::from_fn(|i| {
            let distance = (line(WIRES[i].position) - WIRES[i].offset).abs();
            (distance * 1000.0).round() as u32
        });
        let calibration = ChamberCalibration::uniform(0, 0.001);
        let hits = RawHitSet::new([
            vec![times[0]],
            vec![times[1]],
            vec![900, times[2]],
            vec![times[3]],
        ]);

        let track = reconstruct(&hits, &calibration).unwrap();
        assert_eq!(track.times, times);
        assert_relative_eq!(track.line.slope, 0.05, epsilon = 1e-3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let hits = RawHitSet::new([
            vec![120, 340, 95, 410],
            vec![77],
            vec![260, 180, 15],
            vec![305, 44, 199, 230, 61],
        ]);
        let calibration = ChamberCalibration::uniform(10, 0.02);

        let sequential = ChamberReconstructor::new(ReconstructionConfig::new().with_parallel(false))
            .reconstruct(&hits, &calibration)
            .unwrap();
        let parallel = ChamberReconstructor::new(
            ReconstructionConfig::new()
                .with_parallel(true)
                .with_parallel_threshold(1),
        )
        .reconstruct(&hits, &calibration)
        .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_no_candidate_when_geometry_degenerate() {
        let stacked = [Wire::new(50.0, 0.75); WIRE_COUNT];
        let reconstructor = ChamberReconstructor::default().with_wires(stacked);
        let hits = RawHitSet::new([vec![1], vec![2], vec![3], vec![4]]);
        assert_eq!(
            reconstructor.reconstruct(&hits, &unit_calibration()),
            Err(Error::NoCandidate { combinations: 1 })
        );
    }
}
