/*!
 * Error types for the subsync application.
 *
 * This module contains custom error types for the different parts of the
 * synchronization engine, using the thiserror crate for ergonomic error
 * definitions. Application glue (controller, CLI) wraps these in anyhow.
 */

use std::path::PathBuf;

use thiserror::Error;

use crate::subtitle_processor::SubtitleEncoding;

/// Errors raised when building or parsing a time code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeCodeError {
    /// Text does not look like `HH:MM:SS,mmm`
    #[error("Invalid time format '{0}', expected HH:MM:SS,mmm")]
    InvalidFormat(String),

    /// A component is outside its clock range
    #[error("Time component out of range: {hours:02}:{minutes:02}:{seconds:02},{millis:03}")]
    OutOfRange {
        hours: u32,
        minutes: u32,
        seconds: u32,
        millis: u32,
    },

    /// Raw millisecond value is not within a single day
    #[error("Millisecond value {0} is outside a 24-hour day")]
    MillisOutOfRange(i64),
}

/// Errors that can occur while reading or writing subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The file could not be opened, read or written
    #[error("Failed to access subtitle file {}: {source}", .path.display())]
    Io {
        /// File involved in the failed operation
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not valid for the chosen encoding
    #[error("Failed to decode subtitle content as {encoding}, please check the file encoding")]
    Decode {
        /// Encoding that was requested by the caller
        encoding: SubtitleEncoding,
    },

    /// The content decoded fine but held no usable subtitle block
    #[error("No valid subtitle entries were found")]
    EmptyResult,

    /// A document was saved without ever having a file path
    #[error("The document has no file path yet, use save-as")]
    MissingPath,
}

/// Errors raised by the time-shift and point-sync operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Point sync needs at least two anchors
    #[error("At least 2 sync anchors are required, found {found}")]
    InsufficientAnchors { found: usize },

    /// Each source cue may carry only one anchor
    #[error("Source cue {} already has a sync anchor", .source_index + 1)]
    DuplicateAnchorSource { source_index: usize },

    /// An anchor refers to a cue past the end of the source sequence
    #[error("Source cue index {index} is out of range (sequence has {len} cues)")]
    SourceIndexOutOfRange { index: usize, len: usize },

    /// An anchor refers to a cue past the end of the reference sequence
    #[error("Reference cue index {index} is out of range (sequence has {len} cues)")]
    ReferenceIndexOutOfRange { index: usize, len: usize },

    /// Shift offset exceeds the caller-facing bound
    #[error("Shift of {delta_ms}ms exceeds the allowed range of ±{max_ms}ms")]
    ShiftOutOfRange { delta_ms: i64, max_ms: i64 },
}

/// Errors raised when editing a single field of a cue
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The row does not exist in the document
    #[error("Row {row} is out of range (document has {len} cues)")]
    RowOutOfRange { row: usize, len: usize },

    /// The new start or end time could not be parsed
    #[error("Invalid time code: {0}")]
    InvalidTimeCode(#[from] TimeCodeError),

    /// The new sequence number is not an integer
    #[error("Invalid sequence number '{0}'")]
    InvalidSequenceNumber(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle reading or writing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from a synchronization operation
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Error from a cue edit
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
