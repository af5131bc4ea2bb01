//! trek-io: File I/O for drift chamber track reconstruction.
//!
//! This crate reads setup configurations and event files and writes
//! reconstructed tracks.
//!

pub mod config;
mod error;
pub mod reader;
mod writer;

pub use config::SetupConfig;
pub use error::{Error, Result};
pub use reader::{read_events, EventReader};
pub use writer::{TrackFormat, TrackWriter};
