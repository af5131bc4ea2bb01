//! Error types for trek-core.

use thiserror::Error;

/// Result type alias for trek operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for track reconstruction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The smallest per-wire candidate count is not exactly one.
    ///
    /// A depth of zero means some wire has no physical hit; a depth of two or
    /// more means no wire anchors the event with an unambiguous hit.
    #[error("no eligible hits: minimum per-wire candidate count is {depth}, expected 1")]
    NoEligibleHits { depth: usize },

    /// The least-squares denominator vanished (all points share one x).
    #[error("unfittable point set: degenerate denominator {denominator:e}")]
    Unfittable { denominator: f64 },

    /// A line fit was requested for fewer than two points.
    #[error("cannot fit a line through {0} point(s)")]
    TooFewPoints(usize),

    /// A point sits exactly on the chamber centerline.
    #[error("ambiguous side for wire {wire}: point lies on the centerline")]
    AmbiguousSide { wire: usize },

    /// Every enumerated combination was rejected.
    #[error("no candidate track among {combinations} hit combination(s)")]
    NoCandidate { combinations: usize },

    /// An event names a chamber the setup does not describe.
    #[error("unknown chamber id {0}")]
    UnknownChamber(u64),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Returns true for failures that end a whole reconstruction call.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::NoEligibleHits { .. } | Self::NoCandidate { .. } | Self::UnknownChamber(_)
        )
    }
}
