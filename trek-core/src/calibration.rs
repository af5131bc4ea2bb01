//! Per-wire drift calibration.
#![allow(clippy::cast_lossless)]

use crate::error::{Error, Result};
use crate::geometry::WIRE_COUNT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Time-zero offset and drift speed of one wire.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WireCalibration {
    /// Time-zero offset in raw TDC units.
    pub offset: u32,
    /// Drift speed (distance per raw TDC unit).
    pub speed: f64,
}

impl WireCalibration {
    /// Creates a wire calibration.
    #[inline]
    #[must_use]
    pub const fn new(offset: u32, speed: f64) -> Self {
        Self { offset, speed }
    }

    /// Converts a raw hit time to a drift distance.
    ///
    /// Times at or before the time-zero offset are not physical and yield `None`.
    #[inline]
    #[must_use]
    pub fn drift_distance(&self, raw_time: u32) -> Option<f64> {
        if raw_time > self.offset {
            Some((raw_time - self.offset) as f64 * self.speed)
        } else {
            None
        }
    }
}

/// Calibration of the four wires of one chamber, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChamberCalibration {
    pub wires: [WireCalibration; WIRE_COUNT],
}

impl ChamberCalibration {
    /// Creates a calibration from per-wire records.
    #[must_use]
    pub const fn new(wires: [WireCalibration; WIRE_COUNT]) -> Self {
        Self { wires }
    }

    /// Uses the same offset and drift speed on every wire.
    #[must_use]
    pub const fn uniform(offset: u32, speed: f64) -> Self {
        Self {
            wires: [WireCalibration::new(offset, speed); WIRE_COUNT],
        }
    }

    /// Returns the calibration of one wire.
    ///
    /// # Panics
    /// Panics if `wire >= WIRE_COUNT`.
    #[inline]
    #[must_use]
    pub fn wire(&self, wire: usize) -> &WireCalibration {
        &self.wires[wire]
    }

    /// Sets the time-zero offset on every wire.
    pub fn set_offset(&mut self, offset: u32) {
        for wire in &mut self.wires {
            wire.offset = offset;
        }
    }

    /// Sets the drift speed on every wire.
    pub fn set_speed(&mut self, speed: f64) {
        for wire in &mut self.wires {
            wire.speed = speed;
        }
    }

    /// Replaces the calibration of one wire.
    ///
    /// # Errors
    /// Returns `ConfigError` if `wire` is out of range.
    pub fn set_wire(&mut self, wire: usize, calibration: WireCalibration) -> Result<()> {
        let slot = self.wires.get_mut(wire).ok_or_else(|| {
            Error::ConfigError(format!("wire index {wire} out of range 0..{WIRE_COUNT}"))
        })?;
        *slot = calibration;
        Ok(())
    }

    /// Checks that every drift speed is finite and non-negative.
    ///
    /// # Errors
    /// Returns `ConfigError` naming the first offending wire.
    pub fn validate(&self) -> Result<()> {
        for (i, wire) in self.wires.iter().enumerate() {
            if !wire.speed.is_finite() || wire.speed < 0.0 {
                return Err(Error::ConfigError(format!(
                    "wire {i}: drift speed must be finite and non-negative, got {}",
                    wire.speed
                )));
            }
        }
        Ok(())
    }
}
