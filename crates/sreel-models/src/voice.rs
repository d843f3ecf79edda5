//! Voice-activity spans over narration audio.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A detected speech span in the narration audio.
///
/// Produced by an external voice-activity detector; `confidence` is
/// detector-defined. Spans below the resolver's confidence threshold are
/// ignored during silence-aware trimming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VoiceSpan {
    /// Span start, seconds.
    pub start: f64,
    /// Span end, seconds.
    pub end: f64,
    /// Detector confidence for this span.
    pub confidence: f32,
}

impl VoiceSpan {
    /// Create a new span.
    pub fn new(start: f64, end: f64, confidence: f32) -> Self {
        Self {
            start,
            end,
            confidence,
        }
    }

    /// Span duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Silence gap between this span and a later one, seconds.
    ///
    /// Negative when the spans overlap.
    pub fn gap_to(&self, later: &VoiceSpan) -> f64 {
        later.start - self.end
    }
}
