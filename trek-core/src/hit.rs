//! Raw hit times and drift distance candidates.

use crate::geometry::WIRE_COUNT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw TDC hit times of one event, one ordered sequence per wire.
///
/// A wire may carry no hit or several candidate hits for the same event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawHitSet {
    pub wires: [Vec<u32>; WIRE_COUNT],
}

impl RawHitSet {
    /// Creates an event from per-wire hit times.
    #[must_use]
    pub fn new(wires: [Vec<u32>; WIRE_COUNT]) -> Self {
        Self { wires }
    }

    /// Appends a hit time to one wire.
    ///
    /// # Panics
    /// Panics if `wire >= WIRE_COUNT`.
    pub fn push(&mut self, wire: usize, time: u32) {
        self.wires[wire].push(time);
    }

    /// Hit times of one wire.
    #[inline]
    #[must_use]
    pub fn wire(&self, wire: usize) -> &[u32] {
        &self.wires[wire]
    }

    /// Number of raw hits on each wire.
    #[must_use]
    pub fn counts(&self) -> [usize; WIRE_COUNT] {
        std::array::from_fn(|i| self.wires[i].len())
    }

    /// Total number of raw hits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.wires.iter().map(Vec::len).sum()
    }

    /// Returns true if no wire has a hit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wires.iter().all(Vec::is_empty)
    }
}

impl From<[Vec<u32>; WIRE_COUNT]> for RawHitSet {
    fn from(wires: [Vec<u32>; WIRE_COUNT]) -> Self {
        Self::new(wires)
    }
}

/// A drift distance together with the raw time it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceCandidate {
    /// Drift distance (non-negative for non-negative drift speeds).
    pub distance: f64,
    /// Originating raw hit time.
    pub time: u32,
}

impl DistanceCandidate {
    /// Creates a distance candidate.
    #[inline]
    #[must_use]
    pub const fn new(distance: f64, time: u32) -> Self {
        Self { distance, time }
    }
}

/// Per-wire drift distance candidates of one event, in raw-time order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceSet {
    pub wires: [Vec<DistanceCandidate>; WIRE_COUNT],
}

impl DistanceSet {
    /// Creates a distance set from per-wire candidates.
    #[must_use]
    pub fn new(wires: [Vec<DistanceCandidate>; WIRE_COUNT]) -> Self {
        Self { wires }
    }

    /// Candidates of one wire.
    #[inline]
    #[must_use]
    pub fn wire(&self, wire: usize) -> &[DistanceCandidate] {
        &self.wires[wire]
    }

    /// Number of candidates on each wire.
    #[must_use]
    pub fn counts(&self) -> [usize; WIRE_COUNT] {
        std::array::from_fn(|i| self.wires[i].len())
    }

    /// Smallest per-wire candidate count.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.wires.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// Number of one-candidate-per-wire combinations.
    #[must_use]
    pub fn combinations(&self) -> usize {
        self.wires.iter().map(Vec::len).product()
    }
}
