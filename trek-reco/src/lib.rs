//! trek-reco: Track reconstruction for four-wire drift chambers.
//!
//! The pipeline for one event:
//! - **Distance conversion** - raw TDC times to drift distances, dropping
//!   times before the wire's time zero
//! - **Hit selection** - eligibility check and odometer over per-wire candidates
//! - **Sign resolution** - best of the 16 left/right assignments per combination
//! - **Systematic correction** - incidence-angle correction and refit
//!
//! [`ChamberReconstructor`] drives the pipeline and keeps the candidate with
//! the smallest corrected deviation; [`reconstruct_batch`] runs it over many
//! events.
//!
#![warn(missing_docs)]

pub mod correction;
pub mod distance;
mod processing;
mod reconstruct;
pub mod selection;
pub mod signs;

pub use correction::{correct, systematic_shift};
pub use distance::convert_times;
pub use processing::{reconstruct_batch, ChamberEvent, EventOutcome, ReconstructionStatistics};
pub use reconstruct::{reconstruct, ChamberReconstructor};
pub use selection::{check_eligibility, Combinations, HitSelection};
pub use signs::{resolve_signs, sign_variant, SIGN_PATTERNS};

// Re-export core types used in the public API
pub use trek_core::{
    ChamberCalibration, Error, RawHitSet, ReconstructionConfig, Result, TrackDescription,
};
