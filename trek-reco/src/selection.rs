//! Hit selection: eligibility and per-wire candidate combinations.

use trek_core::error::{Error, Result};
use trek_core::geometry::WIRE_COUNT;
use trek_core::hit::DistanceSet;
use trek_core::track::TrackTimes;

/// Checks whether an event can be reconstructed and counts its combinations.
///
/// An event is eligible only when its smallest per-wire candidate count is
/// exactly one: every wire has a physical hit and at least one wire has a
/// single, unambiguous hit. Events where every wire is ambiguous are rejected
/// even though the search could enumerate them.
///
/// # Errors
/// Returns `NoEligibleHits` carrying the offending depth.
pub fn check_eligibility(distances: &DistanceSet) -> Result<usize> {
    match distances.depth() {
        1 => Ok(distances.combinations()),
        depth => Err(Error::NoEligibleHits { depth }),
    }
}

/// One distance and its raw time per wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitSelection {
    /// Drift distance per wire.
    pub distances: [f64; WIRE_COUNT],
    /// Raw time behind each distance.
    pub times: TrackTimes,
}

impl HitSelection {
    /// Picks candidate `indices[i]` on every wire `i`.
    ///
    /// # Panics
    /// Panics if an index is out of range for its wire.
    #[must_use]
    pub fn from_indices(set: &DistanceSet, indices: &[usize; WIRE_COUNT]) -> Self {
        let picked: [_; WIRE_COUNT] = std::array::from_fn(|i| set.wire(i)[indices[i]]);
        Self {
            distances: picked.map(|c| c.distance),
            times: picked.map(|c| c.time),
        }
    }
}

/// Odometer over the cross product of per-wire candidate indices.
///
/// The last wire turns fastest, so `[0, 0, 0, 0]` comes first and
/// `[n0-1, n1-1, n2-1, n3-1]` last.
#[derive(Debug, Clone)]
pub struct Combinations {
    lengths: [usize; WIRE_COUNT],
    next: Option<[usize; WIRE_COUNT]>,
    remaining: usize,
}

impl Combinations {
    /// Creates the odometer for the given per-wire lengths.
    #[must_use]
    pub fn new(lengths: [usize; WIRE_COUNT]) -> Self {
        let remaining: usize = lengths.iter().product();
        Self {
            lengths,
            next: (remaining > 0).then_some([0; WIRE_COUNT]),
            remaining,
        }
    }

    /// Odometer over every candidate combination of `set`.
    #[must_use]
    pub fn of(set: &DistanceSet) -> Self {
        Self::new(set.counts())
    }

    fn advance(&self, mut indices: [usize; WIRE_COUNT]) -> Option<[usize; WIRE_COUNT]> {
        for wire in (0..WIRE_COUNT).rev() {
            indices[wire] += 1;
            if indices[wire] < self.lengths[wire] {
                return Some(indices);
            }
            indices[wire] = 0;
        }
        None
    }
}

impl Iterator for Combinations {
    type Item = [usize; WIRE_COUNT];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.advance(current);
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Combinations {}
