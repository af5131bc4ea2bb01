//! Setup configuration files.
//!
//! A setup file lists the chambers with their placement and calibration and
//! may override reconstruction parameters:
//!
//! ```json
//! {
//!   "chambers": [
//!     {
//!       "id": 1, "plane": 0, "group": 2,
//!       "points": [[0, 0, 0], [500, 0, 0], [0, 0, 300]],
//!       "wires": [
//!         {"offset": 96, "speed": 0.052}, {"offset": 101, "speed": 0.050},
//!         {"offset": 98, "speed": 0.051}, {"offset": 99, "speed": 0.049}
//!       ]
//!     },
//!     {"id": 2, "offset": 100, "speed": 0.05}
//!   ],
//!   "reconstruction": {"parallel_threshold": 128}
//! }
//! ```
//!
//! A chamber gives either a `wires` list of four calibrations or a single
//! `offset`/`speed` pair applied to every wire.

use crate::{Error, Result};
use log::warn;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use trek_core::calibration::{ChamberCalibration, WireCalibration};
use trek_core::config::ReconstructionConfig;
use trek_core::geometry::{ChamberDescription, ChamberSet, Vec3, WIRE_COUNT};

/// Chambers and reconstruction parameters of one setup.
#[derive(Debug, Clone, Default)]
pub struct SetupConfig {
    /// Chambers keyed by id.
    pub chambers: ChamberSet,
    /// Reconstruction parameters.
    pub reconstruction: ReconstructionConfig,
}

#[derive(Deserialize)]
struct JsonConfig {
    chambers: Vec<JsonChamber>,
    #[serde(default)]
    reconstruction: ReconstructionConfig,
}

#[derive(Deserialize)]
struct JsonChamber {
    id: u64,
    #[serde(default)]
    plane: u32,
    #[serde(default)]
    group: u32,
    #[serde(default)]
    points: [[f64; 3]; 3],
    wires: Option<Vec<JsonWire>>,
    offset: Option<u32>,
    speed: Option<f64>,
}

#[derive(Deserialize)]
struct JsonWire {
    offset: u32,
    speed: f64,
}

impl SetupConfig {
    /// Loads a setup from a JSON file.
    ///
    /// # Errors
    /// Fails on unreadable files, malformed JSON, or invalid chamber entries.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let json_config: JsonConfig = serde_json::from_reader(BufReader::new(file))?;
        Self::from_json_config(json_config)
    }

    /// Loads a setup from a JSON string.
    ///
    /// # Errors
    /// Fails on malformed JSON or invalid chamber entries.
    pub fn from_json(json: &str) -> Result<Self> {
        let json_config: JsonConfig = serde_json::from_str(json)?;
        Self::from_json_config(json_config)
    }

    fn from_json_config(config: JsonConfig) -> Result<Self> {
        let mut chambers = ChamberSet::with_capacity(config.chambers.len());

        for chamber in config.chambers {
            let id = chamber.id;
            let calibration = chamber_calibration(&chamber)?;
            let points = chamber.points.map(|[x, y, z]| Vec3::new(x, y, z));
            let description =
                ChamberDescription::new(points, calibration, chamber.plane, chamber.group);
            if chambers.insert(id, description).is_some() {
                return Err(Error::InvalidFormat(format!("duplicate chamber id {id}")));
            }
        }

        let setup = Self {
            chambers,
            reconstruction: config.reconstruction,
        };
        setup.validate()?;
        Ok(setup)
    }

    /// Validates reconstruction parameters and every chamber calibration.
    ///
    /// A zero drift speed is accepted with a warning since it collapses every
    /// distance onto the wire.
    ///
    /// # Errors
    /// Returns the first invalid entry.
    pub fn validate(&self) -> Result<()> {
        self.reconstruction.validate()?;
        for (id, chamber) in &self.chambers {
            chamber.calibration.validate().map_err(|e| {
                Error::InvalidFormat(format!("chamber {id}: {e}"))
            })?;
            for (wire, params) in chamber.calibration.wires.iter().enumerate() {
                if params.speed == 0.0 {
                    warn!("chamber {id} wire {wire}: drift speed is zero");
                }
            }
        }
        Ok(())
    }

    /// Chamber ids in ascending order.
    #[must_use]
    pub fn chamber_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.chambers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

fn chamber_calibration(chamber: &JsonChamber) -> Result<ChamberCalibration> {
    let id = chamber.id;
    match (&chamber.wires, chamber.offset, chamber.speed) {
        (Some(wires), None, None) => {
            if wires.len() != WIRE_COUNT {
                return Err(Error::InvalidFormat(format!(
                    "chamber {id}: expected {WIRE_COUNT} wire calibrations, got {}",
                    wires.len()
                )));
            }
            Ok(ChamberCalibration::new(std::array::from_fn(|i| {
                WireCalibration::new(wires[i].offset, wires[i].speed)
            })))
        }
        (None, Some(offset), Some(speed)) => Ok(ChamberCalibration::uniform(offset, speed)),
        _ => Err(Error::InvalidFormat(format!(
            "chamber {id}: give either `wires` or both `offset` and `speed`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SETUP: &str = r#"{
        "chambers": [
            {
                "id": 1, "plane": 0, "group": 2,
                "points": [[0, 0, 0], [500, 0, 0], [0, 0, 300]],
                "wires": [
                    {"offset": 96, "speed": 0.052}, {"offset": 101, "speed": 0.050},
                    {"offset": 98, "speed": 0.051}, {"offset": 99, "speed": 0.049}
                ]
            },
            {"id": 2, "offset": 100, "speed": 0.05}
        ],
        "reconstruction": {"parallel_threshold": 128}
    }"#;

    #[test]
    fn test_parse_setup() {
        let setup = SetupConfig::from_json(SETUP).unwrap();
        assert_eq!(setup.chamber_ids(), vec![1, 2]);

        let first = &setup.chambers[&1];
        assert_eq!(first.group, 2);
        assert_eq!(first.calibration.wire(1).offset, 101);
        assert_relative_eq!(first.calibration.wire(3).speed, 0.049);
        assert_relative_eq!(first.points[1].x, 500.0);

        let second = &setup.chambers[&2];
        assert!(second.calibration.wires.iter().all(|w| w.offset == 100));
        assert_eq!(second.points, [Vec3::default(); 3]);

        assert_eq!(setup.reconstruction.parallel_threshold, 128);
        assert_relative_eq!(setup.reconstruction.near_clamp, 6.2);
    }

    #[test]
    fn test_rejects_wrong_wire_count() {
        let json = r#"{"chambers": [{"id": 1, "wires": [{"offset": 0, "speed": 1.0}]}]}"#;
        let err = SetupConfig::from_json(json).unwrap_err();
        assert!(err.to_string().contains("expected 4 wire calibrations"));
    }

    #[test]
    fn test_rejects_missing_calibration() {
        let json = r#"{"chambers": [{"id": 1, "offset": 5}]}"#;
        assert!(matches!(
            SetupConfig::from_json(json),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let json = r#"{"chambers": [
            {"id": 4, "offset": 0, "speed": 1.0},
            {"id": 4, "offset": 0, "speed": 2.0}
        ]}"#;
        let err = SetupConfig::from_json(json).unwrap_err();
        assert!(err.to_string().contains("duplicate chamber id 4"));
    }

    #[test]
    fn test_rejects_negative_speed_and_bad_clamp() {
        let json = r#"{"chambers": [{"id": 1, "offset": 0, "speed": -0.5}]}"#;
        assert!(SetupConfig::from_json(json).is_err());

        let json = r#"{"chambers": [], "reconstruction": {"far_clamp": -1.0}}"#;
        assert!(matches!(
            SetupConfig::from_json(json),
            Err(Error::CoreError(trek_core::Error::ConfigError(_)))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SETUP.as_bytes()).unwrap();
        let setup = SetupConfig::from_file(file.path()).unwrap();
        assert_eq!(setup.chambers.len(), 2);
    }
}
