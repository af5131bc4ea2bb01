//! Left/right ambiguity resolution.
//!
//! A drift distance does not tell on which side of its wire the particle
//! passed. Every combination of sides is fitted and the best one kept.

use log::trace;
use trek_core::geometry::{Wire, WIRE_COUNT};
use trek_core::line::{least_squares, Point2};
use trek_core::track::TrackCandidate;

use crate::selection::HitSelection;

/// Number of side assignments for one hit selection.
pub const SIGN_PATTERNS: u8 = 1 << WIRE_COUNT;

/// Builds the points of one side assignment.
///
/// Bit `i` of `pattern` set places wire `i`'s drift distance below the wire's
/// nominal offset, cleared places it above.
#[must_use]
pub fn sign_variant(
    selection: &HitSelection,
    wires: &[Wire; WIRE_COUNT],
    pattern: u8,
) -> [Point2; WIRE_COUNT] {
    std::array::from_fn(|i| {
        let distance = selection.distances[i];
        let signed = if pattern & (1 << i) == 0 {
            distance
        } else {
            -distance
        };
        Point2::new(wires[i].position, wires[i].offset + signed)
    })
}

/// Fits all side assignments and returns the one with the smallest deviation.
///
/// Patterns are tried in order `0..16`; on equal deviations the earlier
/// pattern is kept. Returns `None` when no pattern is fittable.
#[must_use]
pub fn resolve_signs(
    selection: &HitSelection,
    wires: &[Wire; WIRE_COUNT],
    epsilon: f64,
) -> Option<TrackCandidate> {
    let mut best: Option<TrackCandidate> = None;

    for pattern in 0..SIGN_PATTERNS {
        let points = sign_variant(selection, wires, pattern);
        let fit = match least_squares(&points, epsilon) {
            Ok(fit) if fit.deviation.is_finite() => fit,
            Ok(fit) => {
                trace!("sign pattern {pattern:04b}: non-finite deviation {}", fit.deviation);
                continue;
            }
            Err(err) => {
                trace!("sign pattern {pattern:04b}: {err}");
                continue;
            }
        };

        let better = match &best {
            Some(current) => fit.deviation < current.deviation,
            None => true,
        };
        if better {
            best = Some(TrackCandidate {
                points,
                line: fit.line,
                deviation: fit.deviation,
                times: selection.times,
                signs: pattern,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trek_core::geometry::WIRES;
    use trek_core::line::fit_line;

    fn selection(distances: [f64; WIRE_COUNT]) -> HitSelection {
        HitSelection {
            distances,
            times: [1, 2, 3, 4],
        }
    }

    #[test]
    fn test_sign_variant_bits() {
        let sel = selection([1.0, 2.0, 3.0, 4.0]);
        let points = sign_variant(&sel, &WIRES, 0b0101);

        assert_relative_eq!(points[0].y, 0.75 - 1.0);
        assert_relative_eq!(points[1].y, -0.75 + 2.0);
        assert_relative_eq!(points[2].y, 0.75 - 3.0);
        assert_relative_eq!(points[3].y, -0.75 + 4.0);
        for (point, wire) in points.iter().zip(WIRES.iter()) {
            assert_relative_eq!(point.x, wire.position);
        }
    }

    #[test]
    fn test_picks_minimum_over_all_patterns() {
        let sel = selection([2.5, 0.4, 1.7, 3.1]);
        let best = resolve_signs(&sel, &WIRES, 1e-60).unwrap();

        for pattern in 0..SIGN_PATTERNS {
            let fit = fit_line(&sign_variant(&sel, &WIRES, pattern)).unwrap();
            assert!(best.deviation <= fit.deviation);
        }
        assert_eq!(best.times, [1, 2, 3, 4]);
        assert_eq!(best.points, sign_variant(&sel, &WIRES, best.signs));
    }

    #[test]
    fn test_recovers_straight_track() {
        // y = 0.1 * x - 4 crosses the wires at 0.1, 1.1, 2.1, 3.1.
        let line = |x: f64| 0.1 * x - 4.0;
        let distances: [f64; WIRE_COUNT] =
            std::array::from_fn(|i| (line(WIRES[i].position) - WIRES[i].offset).abs());
        let best = resolve_signs(&selection(distances), &WIRES, 1e-60).unwrap();

        assert_relative_eq!(best.line.slope, 0.1, epsilon = 1e-9);
        assert_relative_eq!(best.line.intercept, -4.0, epsilon = 1e-7);
        assert!(best.deviation < 1e-18);
    }

    #[test]
    fn test_tie_keeps_first_pattern() {
        // Centered wires make pattern p and its complement exact mirrors.
        let centered: [Wire; WIRE_COUNT] =
            std::array::from_fn(|i| Wire::new(WIRES[i].position, 0.0));
        let sel = selection([1.0, 2.5, 0.5, 3.0]);
        let best = resolve_signs(&sel, &centered, 1e-60).unwrap();

        assert!(best.signs < SIGN_PATTERNS / 2);
        let mirrored = fit_line(&sign_variant(&sel, &centered, !best.signs & 0b1111)).unwrap();
        assert_eq!(mirrored.deviation.to_bits(), best.deviation.to_bits());
    }

    #[test]
    fn test_equal_distances_prefer_one_side() {
        let best = resolve_signs(&selection([10.0; WIRE_COUNT]), &WIRES, 1e-60).unwrap();
        assert!(best.signs == 0 || best.signs == 0b1111);
        assert_relative_eq!(best.deviation, 1.8, epsilon = 1e-9);
    }

    #[test]
    fn test_unfittable_geometry_yields_none() {
        let stacked = [Wire::new(50.0, 0.75); WIRE_COUNT];
        assert!(resolve_signs(&selection([1.0; WIRE_COUNT]), &stacked, 1e-60).is_none());
    }
}
