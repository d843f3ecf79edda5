//! Placed clips in the assembled output sequence.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One placed clip in the final assembled sequence.
///
/// `in_point`/`out_point` address the source media; `timeline_start`/
/// `timeline_duration` address the output. When the source range is shorter
/// than `timeline_duration`, the renderer loops the clip or holds its last
/// frame to fill the slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimelineEntry {
    /// Opaque reference to the source media.
    pub source: String,
    /// In-point within the source, seconds.
    pub in_point: f64,
    /// Out-point within the source, seconds.
    pub out_point: f64,
    /// Position of this clip in the output, seconds.
    pub timeline_start: f64,
    /// Length of the slot this clip fills in the output, seconds.
    pub timeline_duration: f64,
}

impl TimelineEntry {
    /// End position of this clip in the output, seconds.
    pub fn timeline_end(&self) -> f64 {
        self.timeline_start + self.timeline_duration
    }

    /// Duration of the source range, seconds.
    pub fn source_duration(&self) -> f64 {
        self.out_point - self.in_point
    }

    /// Whether the source range is shorter than the slot it fills.
    pub fn needs_hold(&self) -> bool {
        self.source_duration() + 1e-9 < self.timeline_duration
    }
}
