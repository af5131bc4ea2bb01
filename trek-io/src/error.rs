//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid file content.
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    /// Malformed event record.
    #[error("line {line}: {message}")]
    InvalidEvent { line: usize, message: String },

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] trek_core::Error),
}
