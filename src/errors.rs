/*!
 * Error types for the clipsmith application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while probing or reading a single media item
#[derive(Error, Debug)]
pub enum MediaError {
    /// The file could not be read or decoded at all
    #[error("Unreadable media file {path:?}: {reason}")]
    Unreadable {
        /// Path to the offending file
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// The file exists but is neither an image nor a video we can place on a timeline
    #[error("Unsupported media kind for {path:?}")]
    UnsupportedKind {
        /// Path to the offending file
        path: PathBuf,
    },

    /// The probe returned no usable dimensions
    #[error("No video stream with dimensions found in {path:?}")]
    MissingDimensions {
        /// Path to the offending file
        path: PathBuf,
    },
}

/// Errors that can occur during subtitle track handling
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A cue or entry has end <= start
    #[error("Invalid time range: end time {end_ms} <= start time {start_ms}")]
    InvalidTimeRange {
        /// Cue start in milliseconds
        start_ms: u64,
        /// Cue end in milliseconds
        end_ms: u64,
    },

    /// The track file could not be parsed
    #[error("Failed to parse subtitle track: {0}")]
    ParseFailed(String),
}

/// Errors raised by the composition and encoding stages
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// Invalid caller-supplied input, raised before any work starts
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every media item was dropped during normalization
    #[error("No usable media: all {attempted} item(s) failed to load")]
    NoUsableMedia {
        /// How many items were attempted
        attempted: usize,
    },

    /// Concatenation or audio-attach failure
    #[error("Composition failed at stage '{stage}': {reason}")]
    Composition {
        /// Pipeline stage label
        stage: &'static str,
        /// Underlying cause
        reason: String,
    },

    /// Final encode failure; never retried by the engine
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a single media item
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from assembly or encoding
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

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
