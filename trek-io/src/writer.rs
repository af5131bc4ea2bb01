//! Track file writers.

use crate::Result;
use log::warn;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use trek_core::track::TrackDescription;
use trek_reco::EventOutcome;

/// Output layout for reconstructed tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// One JSON object per line.
    JsonLines,
}

impl TrackFormat {
    /// Picks the format from a file extension.
    ///
    /// Unknown or missing extensions fall back to CSV.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some("csv") => Self::Csv,
            Some("jsonl" | "json") => Self::JsonLines,
            other => {
                warn!("unknown track file extension {other:?}, writing CSV");
                Self::Csv
            }
        }
    }
}

#[derive(Serialize)]
struct JsonTrack<'a> {
    event: u64,
    chamber: u64,
    #[serde(flatten)]
    track: &'a TrackDescription,
}

/// Writer for reconstructed tracks.
pub struct TrackWriter<W: Write = BufWriter<File>> {
    writer: W,
    format: TrackFormat,
    wrote_header: bool,
}

impl TrackWriter {
    /// Creates a track file, choosing the format from its extension.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let format = TrackFormat::from_path(&path);
        Self::create_with_format(path, format)
    }

    /// Creates a track file in the given format.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create_with_format<P: AsRef<Path>>(path: P, format: TrackFormat) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), format))
    }
}

impl<W: Write> TrackWriter<W> {
    /// Wraps any writer.
    #[must_use]
    pub fn new(writer: W, format: TrackFormat) -> Self {
        Self {
            writer,
            format,
            wrote_header: false,
        }
    }

    /// Output format.
    #[must_use]
    pub fn format(&self) -> TrackFormat {
        self.format
    }

    /// Writes one track.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_track(&mut self, event: u64, chamber: u64, track: &TrackDescription) -> Result<()> {
        match self.format {
            TrackFormat::Csv => {
                if !self.wrote_header {
                    writeln!(
                        self.writer,
                        "event,chamber,slope,intercept,deviation,y0,y1,y2,y3,t0,t1,t2,t3"
                    )?;
                    self.wrote_header = true;
                }
                let [p0, p1, p2, p3] = track.points;
                let [t0, t1, t2, t3] = track.times;
                writeln!(
                    self.writer,
                    "{},{},{},{},{},{},{},{},{},{},{},{},{}",
                    event,
                    chamber,
                    track.line.slope,
                    track.line.intercept,
                    track.deviation,
                    p0.y,
                    p1.y,
                    p2.y,
                    p3.y,
                    t0,
                    t1,
                    t2,
                    t3
                )?;
            }
            TrackFormat::JsonLines => {
                let record = JsonTrack {
                    event,
                    chamber,
                    track,
                };
                serde_json::to_writer(&mut self.writer, &record)?;
                writeln!(self.writer)?;
            }
        }
        Ok(())
    }

    /// Writes the track of every successful outcome and returns how many were written.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_outcomes(&mut self, outcomes: &[EventOutcome]) -> Result<usize> {
        let mut written = 0;
        for outcome in outcomes {
            if let Some(track) = outcome.track() {
                self.write_track(outcome.event, outcome.chamber, track)?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// Flushes the writer.
    ///
    /// # Errors
    /// Returns an error if flushing fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the inner writer.
    ///
    /// # Errors
    /// Returns an error if flushing fails.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
