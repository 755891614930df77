//! Error types for the face keyframe library.

use crate::gaze::EyeSide;
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Action unit label does not carry a numeric code
    #[error("Malformed action unit label: {0:?}")]
    MalformedLabel(String),

    /// Action unit code outside the supported range
    #[error("Unknown action unit code: {0}")]
    UnknownActionUnit(u8),

    /// Tracker exposes no landmark model for the requested eye
    #[error("Gaze model unavailable for {0} eye")]
    GazeModelUnavailable(EyeSide),

    /// Geometry collapsed (zero depth, zero span, zero-length vector)
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Whether this error only drops part of a frame rather than aborting a run
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedLabel(_)
                | Self::UnknownActionUnit(_)
                | Self::GazeModelUnavailable(_)
                | Self::DegenerateInput(_)
        )
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
