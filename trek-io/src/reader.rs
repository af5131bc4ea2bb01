//! Event file reader.
//!
//! Events are stored as JSON lines, one chamber event per line:
//!
//! ```text
//! {"id": 7, "chamber": 1, "times": [[412], [388, 1020], [455], [301]]}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::{Error, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use trek_core::geometry::WIRE_COUNT;
use trek_core::hit::RawHitSet;
use trek_reco::ChamberEvent;

#[derive(Deserialize)]
struct JsonEvent {
    id: u64,
    #[serde(default)]
    chamber: u64,
    times: [Vec<u32>; WIRE_COUNT],
}

/// Streaming reader over a JSON-lines event file.
pub struct EventReader<R> {
    reader: R,
    line: usize,
    buffer: String,
}

impl EventReader<BufReader<File>> {
    /// Opens an event file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> EventReader<R> {
    /// Wraps a buffered reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buffer: String::new(),
        }
    }

    /// Number of lines consumed so far.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    fn parse(&self, text: &str) -> Result<ChamberEvent> {
        let event: JsonEvent = serde_json::from_str(text).map_err(|e| Error::InvalidEvent {
            line: self.line,
            message: e.to_string(),
        })?;
        Ok(ChamberEvent::new(
            event.id,
            event.chamber,
            RawHitSet::new(event.times),
        ))
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<ChamberEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(e) => return Some(Err(e.into())),
            }
            let text = self.buffer.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            return Some(self.parse(text));
        }
    }
}

/// Reads every event of a file.
///
/// # Errors
/// Stops at the first unreadable or malformed line.
pub fn read_events<P: AsRef<Path>>(path: P) -> Result<Vec<ChamberEvent>> {
    EventReader::open(path)?.collect()
}
