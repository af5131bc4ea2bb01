//! Reconstruction configuration.

use crate::error::{Error, Result};
use crate::line::DEGENERACY_EPSILON;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Drift distance limit for a point on the same side as its wire.
pub const NEAR_CLAMP: f64 = 6.2;
/// Drift distance limit for a point on the opposite side of its wire.
pub const FAR_CLAMP: f64 = 3.6;

/// Configuration for track reconstruction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReconstructionConfig {
    /// Largest drift distance used by the correction when point and wire share a side.
    pub near_clamp: f64,
    /// Largest drift distance used by the correction when point and wire are on opposite sides.
    pub far_clamp: f64,
    /// Fit denominators at or below this magnitude are degenerate.
    pub degeneracy_epsilon: f64,
    /// Allow the rayon pool for large searches and event batches.
    pub parallel: bool,
    /// Combination count from which one event's search runs in parallel.
    pub parallel_threshold: usize,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            near_clamp: NEAR_CLAMP,
            far_clamp: FAR_CLAMP,
            degeneracy_epsilon: DEGENERACY_EPSILON,
            parallel: true,
            parallel_threshold: 64,
        }
    }
}

impl ReconstructionConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the same-side drift limit.
    #[must_use]
    pub fn with_near_clamp(mut self, limit: f64) -> Self {
        self.near_clamp = limit;
        self
    }

    /// Sets the opposite-side drift limit.
    #[must_use]
    pub fn with_far_clamp(mut self, limit: f64) -> Self {
        self.far_clamp = limit;
        self
    }

    /// Sets the fit degeneracy threshold.
    #[must_use]
    pub fn with_degeneracy_epsilon(mut self, epsilon: f64) -> Self {
        self.degeneracy_epsilon = epsilon;
        self
    }

    /// Enables or disables parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the combination count that switches one event to the parallel search.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Checks the configuration for values the reconstruction cannot use.
    ///
    /// # Errors
    /// Returns `ConfigError` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        for (name, limit) in [("near_clamp", self.near_clamp), ("far_clamp", self.far_clamp)] {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(Error::ConfigError(format!(
                    "{name} must be finite and positive, got {limit}"
                )));
            }
        }
        if !self.degeneracy_epsilon.is_finite() || self.degeneracy_epsilon < 0.0 {
            return Err(Error::ConfigError(format!(
                "degeneracy_epsilon must be finite and non-negative, got {}",
                self.degeneracy_epsilon
            )));
        }
        Ok(())
    }
}
