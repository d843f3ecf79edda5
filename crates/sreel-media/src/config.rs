//! Configuration for the analysis and selection pipeline.
//!
//! These parameters control window sampling, dead-zone filtering, and the
//! diversity constraints of the variant selector. Defaults are tuned for
//! short vertical social clips cut from handheld or b-roll footage.

use serde::{Deserialize, Serialize};

/// Configuration for footage analysis and variant selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    // === Window Sampling ===
    /// Frames sampled per analysis window (default: 15).
    pub sample_count: usize,

    /// Width of the downscaled grayscale grid used for scoring (default: 64).
    ///
    /// Height follows the source aspect ratio.
    pub analysis_grid_width: u32,

    /// Gaussian blur sigma applied before differencing (default: 1.0).
    ///
    /// Suppresses sensor noise so near-static footage scores near zero.
    pub blur_sigma: f32,

    // === Window Placement ===
    /// Fraction of a window shared with its successor (default: 0.4, valid 0.3-0.5).
    pub window_overlap: f64,

    /// Shortest allowed analysis window, seconds (default: 1.5).
    pub min_segment_duration: f64,

    /// Longest allowed analysis window, seconds (default: 3.0).
    pub max_segment_duration: f64,

    // === Candidate Filtering ===
    /// Windows whose darkest sample falls below this mean intensity are
    /// dropped as near-black (default: 0.08).
    pub near_black_threshold: f64,

    /// Windows with motion below this are dropped as dead zones (default: 0.008).
    pub dead_zone_motion_threshold: f64,

    // === Variant Selection ===
    /// Motion floor for selected segments, stricter than the dead-zone
    /// threshold so variants never pad with static filler (default: 0.02).
    pub min_motion_floor: f64,

    /// Hamming distance at or below which two fingerprints count as a
    /// near-duplicate pair (default: 12 of 64 bits).
    pub hamming_threshold: u32,

    /// Fraction of near-duplicate fingerprint pairs above which two
    /// segments are considered visually similar (default: 0.5).
    pub similarity_fraction: f64,

    /// Number of time-ordered buckets used to spread selections across the
    /// source (default: 5).
    pub bucket_count: usize,

    // === Progress ===
    /// Windows scanned between progress-observer invocations (default: 10).
    pub progress_stride: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            // Window Sampling
            sample_count: 15,
            analysis_grid_width: 64,
            blur_sigma: 1.0,

            // Window Placement
            window_overlap: 0.4,
            min_segment_duration: 1.5,
            max_segment_duration: 3.0,

            // Candidate Filtering
            near_black_threshold: 0.08,
            dead_zone_motion_threshold: 0.008,

            // Variant Selection
            min_motion_floor: 0.02,
            hamming_threshold: 12,
            similarity_fraction: 0.5,
            bucket_count: 5,

            // Progress
            progress_stride: 10,
        }
    }
}

impl AnalysisConfig {
    /// Fast configuration for previews: fewer samples, coarser windows.
    pub fn fast() -> Self {
        Self {
            sample_count: 8,
            window_overlap: 0.3,
            ..Default::default()
        }
    }

    /// Quality configuration for final renders: denser sampling and a
    /// stricter duplicate threshold.
    pub fn quality() -> Self {
        Self {
            sample_count: 20,
            window_overlap: 0.5,
            hamming_threshold: 10,
            ..Default::default()
        }
    }

    /// Builder-style setter for the window overlap fraction.
    pub fn with_overlap(mut self, overlap: f64) -> Self {
        self.window_overlap = overlap.clamp(0.3, 0.5);
        self
    }

    /// Builder-style setter for the per-window sample count.
    pub fn with_sample_count(mut self, count: usize) -> Self {
        self.sample_count = count.max(2);
        self
    }

    /// Builder-style setter for the selector's motion floor.
    pub fn with_min_motion_floor(mut self, floor: f64) -> Self {
        self.min_motion_floor = floor.max(0.0);
        self
    }

    /// Analysis window length for a given target clip duration, seconds.
    ///
    /// A tenth of the target, clamped so windows stay cuttable: long enough
    /// to read as a shot, short enough to assemble flexibly.
    pub fn segment_duration_for(&self, target_duration: f64) -> f64 {
        (target_duration / 10.0).clamp(self.min_segment_duration, self.max_segment_duration)
    }

    /// Stride between window starts, seconds.
    pub fn window_step(&self, segment_duration: f64) -> f64 {
        segment_duration * (1.0 - self.window_overlap.clamp(0.3, 0.5))
    }
}
