//! I/O error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A coordinate-file row could not be parsed.
    #[error("malformed input in {path} at line {line}: {reason}")]
    MalformedInput {
        /// Source file.
        path: PathBuf,
        /// 1-based line number, counting the header.
        line: usize,
        /// What went wrong with the row.
        reason: String,
    },

    /// No pads survived filtering.
    #[error("no usable pads in {path}")]
    EmptyInput {
        /// Source file.
        path: PathBuf,
    },

    /// Configuration file could not be deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration carried an invalid value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Core geometry error.
    #[error("geometry error: {0}")]
    Core(#[from] bandgem_core::Error),
}
