//! Error types for analysis and assembly operations.

use thiserror::Error;

/// Result type for analysis and assembly operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during footage analysis and timeline assembly.
///
/// Degraded-but-successful conditions (reused segments, unmatched entries,
/// no detected voice activity) are never errors; they are reported as
/// metadata on result types. Only structurally invalid input and truly
/// unusable content surface here.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Structurally invalid input: negative durations, zero variants,
    /// malformed time ranges, mismatched list lengths.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The calling operation cannot proceed with the given content:
    /// unreadable or zero-duration source, empty candidate list after
    /// filtering, empty footage library. Callers decide between
    /// retry-with-different-input and abort.
    #[error("no usable content: {0}")]
    NoUsableContent(String),

    /// The frame source failed in a way that is not a single-frame skip.
    #[error("frame decode failed: {0}")]
    DecodeFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a no-usable-content error.
    pub fn no_usable_content(message: impl Into<String>) -> Self {
        Self::NoUsableContent(message.into())
    }

    /// Create a decode failure error.
    pub fn decode_failed(message: impl Into<String>) -> Self {
        Self::DecodeFailed(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
