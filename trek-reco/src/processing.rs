//! Batch reconstruction over many chamber events.
#![allow(clippy::cast_precision_loss)]

use log::debug;
use rayon::prelude::*;
use trek_core::error::{Error, Result};
use trek_core::geometry::ChamberSet;
use trek_core::hit::RawHitSet;
use trek_core::track::TrackDescription;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::reconstruct::ChamberReconstructor;

/// Raw hits of one chamber in one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChamberEvent {
    /// Event number.
    pub id: u64,
    /// Chamber the hits were read from.
    pub chamber: u64,
    /// Per-wire raw times.
    pub hits: RawHitSet,
}

impl ChamberEvent {
    /// Creates a chamber event.
    #[must_use]
    pub fn new(id: u64, chamber: u64, hits: RawHitSet) -> Self {
        Self { id, chamber, hits }
    }
}

/// Reconstruction result of one chamber event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    /// Event number.
    pub event: u64,
    /// Chamber id.
    pub chamber: u64,
    /// Reconstructed track or the reason there is none.
    pub result: Result<TrackDescription>,
}

impl EventOutcome {
    /// The reconstructed track, if any.
    #[must_use]
    pub fn track(&self) -> Option<&TrackDescription> {
        self.result.as_ref().ok()
    }
}

/// Reconstructs every event against its chamber's calibration.
///
/// Runs on the rayon pool when the reconstructor's configuration allows it.
/// Outcomes keep the input order. An event naming an unknown chamber fails
/// with `UnknownChamber` without affecting the others.
#[must_use]
pub fn reconstruct_batch(
    events: &[ChamberEvent],
    chambers: &ChamberSet,
    reconstructor: &ChamberReconstructor,
) -> Vec<EventOutcome> {
    let process = |event: &ChamberEvent| {
        let result = chambers
            .get(&event.chamber)
            .ok_or(Error::UnknownChamber(event.chamber))
            .and_then(|chamber| reconstructor.reconstruct(&event.hits, &chamber.calibration));
        if let Err(err) = &result {
            debug!("event {} chamber {}: {err}", event.id, event.chamber);
        }
        EventOutcome {
            event: event.id,
            chamber: event.chamber,
            result,
        }
    };

    if reconstructor.config().parallel {
        events.par_iter().map(process).collect()
    } else {
        events.iter().map(process).collect()
    }
}

/// Counters over a run of reconstructions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReconstructionStatistics {
    /// Events seen.
    pub events: usize,
    /// Tracks reconstructed.
    pub tracks: usize,
    /// Events without an anchoring unambiguous wire or with an empty wire.
    pub no_eligible_hits: usize,
    /// Eligible events where every combination was rejected.
    pub no_candidate: usize,
    /// Events naming an unknown chamber.
    pub unknown_chamber: usize,
    /// Any other failure.
    pub other: usize,
}

impl ReconstructionStatistics {
    /// Counts one reconstruction result.
    pub fn record(&mut self, result: &Result<TrackDescription>) {
        self.events += 1;
        match result {
            Ok(_) => self.tracks += 1,
            Err(Error::NoEligibleHits { .. }) => self.no_eligible_hits += 1,
            Err(Error::NoCandidate { .. }) => self.no_candidate += 1,
            Err(Error::UnknownChamber(_)) => self.unknown_chamber += 1,
            Err(_) => self.other += 1,
        }
    }

    /// Counts a batch of outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: &[EventOutcome]) -> Self {
        let mut stats = Self::default();
        for outcome in outcomes {
            stats.record(&outcome.result);
        }
        stats
    }

    /// Adds the counters of another run.
    pub fn merge(&mut self, other: &Self) {
        self.events += other.events;
        self.tracks += other.tracks;
        self.no_eligible_hits += other.no_eligible_hits;
        self.no_candidate += other.no_candidate;
        self.unknown_chamber += other.unknown_chamber;
        self.other += other.other;
    }

    /// Fraction of events that produced a track (0 for no events).
    #[must_use]
    pub fn success_ratio(&self) -> f64 {
        if self.events == 0 {
            0.0
        } else {
            self.tracks as f64 / self.events as f64
        }
    }
}
