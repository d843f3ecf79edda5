//! Scored footage segments produced by frame-level analysis.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Weight of the motion component in the combined score.
pub const WEIGHT_MOTION: f64 = 0.6;
/// Weight of the content-variance component in the combined score.
pub const WEIGHT_VARIANCE: f64 = 0.3;
/// Weight of the brightness component in the combined score.
pub const WEIGHT_BRIGHTNESS: f64 = 0.1;

/// One analyzed window of source footage: a candidate cut or a selected cut.
///
/// Created by the candidate generator, immutable once scored. The selector
/// and timeline builder consume segments without mutating them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoSegment {
    /// Start of the window in the source, seconds.
    pub start_time: f64,
    /// End of the window in the source, seconds. Always greater than `start_time`.
    pub end_time: f64,
    /// Mean absolute inter-frame pixel difference, normalized to [0, 1].
    pub motion_score: f64,
    /// Mean pairwise difference among first/middle/last sample, normalized to [0, 1].
    ///
    /// Distinguishes changing content from a static shot that happens to
    /// contain local motion (e.g. a talking head against a fixed backdrop).
    pub variance_score: f64,
    /// Mean pixel intensity across samples, normalized to [0, 1].
    pub avg_brightness: f64,
    /// Lowest per-sample mean intensity seen in the window, normalized to [0, 1].
    pub min_brightness: f64,
    /// Perceptual fingerprints, one per hashed sample position.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fingerprints: Vec<u64>,
}

impl VideoSegment {
    /// Window duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Combined engagement score used to rank candidates.
    ///
    /// `0.6*motion + 0.3*variance + 0.1*(1 - |brightness - 0.5|)`: motion
    /// dominates, and mid-range exposure gets a small bonus over crushed
    /// blacks or blown-out whites.
    pub fn combined_score(&self) -> f64 {
        WEIGHT_MOTION * self.motion_score
            + WEIGHT_VARIANCE * self.variance_score
            + WEIGHT_BRIGHTNESS * (1.0 - (self.avg_brightness - 0.5).abs())
    }

    /// Whether this segment's time range intersects another's.
    pub fn overlaps(&self, other: &VideoSegment) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}
