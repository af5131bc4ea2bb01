#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
use approx::assert_relative_eq;
use trek_core::geometry::{WIRES, WIRE_COUNT};
use trek_core::line::fit_line;
use trek_reco::{
    check_eligibility, convert_times, reconstruct, resolve_signs, ChamberCalibration,
    ChamberReconstructor, Combinations, Error, HitSelection, RawHitSet, ReconstructionConfig,
};

/// Raw times of a track `y = slope * x + intercept` at 1 ns per 0.01 drift units.
fn times_for_line(slope: f64, intercept: f64) -> [u32; WIRE_COUNT] {
    std::array::from_fn(|i| {
        let y = slope * WIRES[i].position + intercept;
        ((y - WIRES[i].offset).abs() * 100.0).round() as u32
    })
}

fn calibration() -> ChamberCalibration {
    ChamberCalibration::uniform(0, 0.01)
}

#[test]
fn test_eligibility_table() {
    let cases: [([usize; WIRE_COUNT], Option<usize>); 4] = [
        ([0, 1, 1, 1], None),
        ([1, 1, 1, 1], Some(1)),
        ([2, 2, 2, 2], None),
        ([1, 2, 1, 1], Some(2)),
    ];
    for (counts, expected) in cases {
        let hits = RawHitSet::new(std::array::from_fn(|wire| {
            (0..counts[wire]).map(|i| 100 + i as u32 * 50).collect()
        }));
        let distances = convert_times(&hits, &calibration());
        assert_eq!(check_eligibility(&distances).ok(), expected, "counts {counts:?}");
        if let Some(n) = expected {
            assert_eq!(Combinations::of(&distances).count(), n);
        }
    }
}

#[test]
fn test_empty_event_is_no_eligible_hits() {
    let hits = RawHitSet::new([vec![], vec![], vec![], vec![]]);
    assert_eq!(
        reconstruct(&hits, &calibration()),
        Err(Error::NoEligibleHits { depth: 0 })
    );
}

#[test]
fn test_times_before_time_zero_are_ignored() {
    let times = times_for_line(0.02, 2.0);
    let mut calibration = calibration();
    calibration.set_offset(20);
    let shifted: [Vec<u32>; WIRE_COUNT] = std::array::from_fn(|i| vec![5, times[i] + 20]);
    // Every wire has exactly one physical time once the early hit is dropped.
    let track = reconstruct(&RawHitSet::new(shifted), &calibration).unwrap();
    let expected: [u32; WIRE_COUNT] = std::array::from_fn(|i| times[i] + 20);
    assert_eq!(track.times, expected);
}

#[test]
fn test_reconstructs_inclined_track() {
    let times = times_for_line(-0.04, 5.0);
    let hits = RawHitSet::new(times.map(|t| vec![t]));
    let track = reconstruct(&hits, &calibration()).unwrap();

    assert_relative_eq!(track.line.slope, -0.04, epsilon = 2e-3);
    assert_eq!(track.times, times);
    assert!(track.deviation >= 0.0);
    for (point, wire) in track.points.iter().zip(WIRES.iter()) {
        assert_relative_eq!(point.x, wire.position);
    }
}

#[test]
fn test_result_not_worse_than_any_combination() {
    let hits = RawHitSet::new([vec![260, 410], vec![355], vec![180, 95, 300], vec![505]]);
    let reconstructor = ChamberReconstructor::new(ReconstructionConfig::new().with_parallel(false));
    let track = reconstructor.reconstruct(&hits, &calibration()).unwrap();

    let distances = convert_times(&hits, &calibration());
    for indices in Combinations::of(&distances) {
        let selection = HitSelection::from_indices(&distances, &indices);
        let epsilon = reconstructor.config().degeneracy_epsilon;
        let Some(candidate) = resolve_signs(&selection, &WIRES, epsilon) else {
            continue;
        };
        if let Ok(corrected) = trek_reco::correct(&candidate, &WIRES, reconstructor.config()) {
            assert!(track.deviation <= corrected.deviation);
        }
    }
    let refit = fit_line(&track.points).unwrap();
    assert_relative_eq!(refit.deviation, track.deviation, epsilon = 1e-12);
}

#[test]
fn test_repeatable() {
    let hits = RawHitSet::new([vec![260, 410], vec![355], vec![180, 95, 300], vec![505]]);
    let first = reconstruct(&hits, &calibration());
    let second = reconstruct(&hits, &calibration());
    assert_eq!(first, second);
}
