//! Full-source candidate scan.
//!
//! Slides an analysis window across the whole source, scores each window,
//! and drops near-black windows and dead zones. Survivors come back sorted
//! by combined score descending, the ordering the variant selector's
//! greedy passes depend on.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use rayon::prelude::*;
use sreel_models::VideoSegment;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::{MediaError, MediaResult};
use crate::frame_source::{lock_source, SharedFrameSource};
use crate::progress::{ProgressObserver, ScanProgress};
use crate::sampler::sample_window;
use crate::scorer::score_samples;

/// One planned analysis window.
#[derive(Debug, Clone, Copy)]
struct WindowSpec {
    start_time: f64,
    end_time: f64,
    start_frame: u64,
    end_frame: u64,
}

/// Scans a source for scored, filtered candidate segments.
pub struct CandidateGenerator {
    config: AnalysisConfig,
}

impl CandidateGenerator {
    /// Create a generator with the given configuration.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Scan the full source and return surviving candidates, best first.
    ///
    /// Windows are scored in parallel; the shared decode handle is locked
    /// per window so seek+read stays serialized. An empty result is not an
    /// error here; the pipeline entry maps it to the no-usable-content
    /// condition.
    pub fn generate(
        &self,
        source: &SharedFrameSource,
        target_duration: f64,
        observer: Option<&ProgressObserver>,
    ) -> MediaResult<Vec<VideoSegment>> {
        if target_duration <= 0.0 {
            return Err(MediaError::invalid_input(
                "target duration must be positive",
            ));
        }

        let info = lock_source(source)?.info();
        if !info.is_usable() {
            return Err(MediaError::no_usable_content(
                "source reports no decodable duration",
            ));
        }

        let segment_duration = self.config.segment_duration_for(target_duration);
        let windows = self.plan_windows(info.duration, segment_duration, &info);
        let total = windows.len();

        let scanned = AtomicUsize::new(0);
        let stride = self.config.progress_stride.max(1);

        let scored: MediaResult<Vec<Option<VideoSegment>>> = windows
            .par_iter()
            .map(|window| {
                // Decode under the lock, score outside it.
                let samples = {
                    let mut src = lock_source(source)?;
                    sample_window(&mut *src, window.start_frame, window.end_frame, &self.config)?
                };
                let scores = score_samples(&samples);

                let done = scanned.fetch_add(1, AtomicOrdering::Relaxed) + 1;
                if let Some(observer) = observer {
                    if done % stride == 0 || done == total {
                        observer(ScanProgress {
                            windows_scanned: done,
                            windows_total: total,
                        });
                    }
                }

                if samples.is_empty() {
                    // Nothing decoded: dead zone.
                    return Ok(None);
                }

                let segment = VideoSegment {
                    start_time: window.start_time,
                    end_time: window.end_time,
                    motion_score: scores.motion,
                    variance_score: scores.variance,
                    avg_brightness: scores.avg_brightness,
                    min_brightness: scores.min_brightness,
                    fingerprints: scores.fingerprint.into_iter().collect(),
                };

                if segment.min_brightness < self.config.near_black_threshold {
                    return Ok(None);
                }
                if segment.motion_score < self.config.dead_zone_motion_threshold {
                    return Ok(None);
                }

                Ok(Some(segment))
            })
            .collect();

        let mut candidates: Vec<VideoSegment> = scored?.into_iter().flatten().collect();
        let dropped = total - candidates.len();

        candidates.sort_by(|a, b| {
            b.combined_score()
                .partial_cmp(&a.combined_score())
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    a.start_time
                        .partial_cmp(&b.start_time)
                        .unwrap_or(Ordering::Equal)
                })
        });

        metrics::counter!("sreel_scan_windows_total").increment(total as u64);
        metrics::counter!("sreel_scan_windows_dropped_total").increment(dropped as u64);

        debug!(
            windows = total,
            candidates = candidates.len(),
            dropped,
            segment_duration,
            "candidate scan complete"
        );

        Ok(candidates)
    }

    /// Plan window placement across the source duration.
    fn plan_windows(
        &self,
        duration: f64,
        segment_duration: f64,
        info: &crate::frame_source::SourceInfo,
    ) -> Vec<WindowSpec> {
        let step = self.config.window_step(segment_duration);
        let mut windows = Vec::new();

        let mut start = 0.0;
        while start + segment_duration <= duration + 1e-6 {
            windows.push(self.window_at(start, start + segment_duration, info));
            start += step;
        }

        // Source shorter than one window: analyze it whole.
        if windows.is_empty() && duration > 0.0 {
            windows.push(self.window_at(0.0, duration, info));
        }

        windows
    }

    fn window_at(
        &self,
        start_time: f64,
        end_time: f64,
        info: &crate::frame_source::SourceInfo,
    ) -> WindowSpec {
        let start_frame = info.frame_at(start_time);
        let end_frame = info.frame_at(end_time).max(start_frame + 1);
        WindowSpec {
            start_time,
            end_time,
            start_frame,
            end_frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::frame_source::share;
    use crate::testing::SyntheticFrameSource;

    #[test]
    fn test_lively_source_yields_sorted_candidates() {
        let source = share(SyntheticFrameSource::lively(30.0, 20.0, 160, 90));
        let generator = CandidateGenerator::new(AnalysisConfig::default());
        let candidates = generator.generate(&source, 20.0, None).unwrap();

        assert!(!candidates.is_empty());
        for pair in candidates.windows(2) {
            assert!(pair[0].combined_score() >= pair[1].combined_score());
        }
    }

    #[test]
    fn test_static_dark_source_yields_no_candidates() {
        let source = share(SyntheticFrameSource::static_dark(30.0, 10.0, 160, 90));
        let generator = CandidateGenerator::new(AnalysisConfig::default());
        let candidates = generator.generate(&source, 10.0, None).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_progress_observer_invoked() {
        let source = share(SyntheticFrameSource::lively(30.0, 30.0, 160, 90));
        let generator = CandidateGenerator::new(AnalysisConfig::default());

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let observer: crate::progress::ProgressObserver =
            Arc::new(move |_p| {
                seen.fetch_add(1, Ordering::Relaxed);
            });

        generator.generate(&source, 30.0, Some(&observer)).unwrap();
        assert!(calls.load(Ordering::Relaxed) >= 1);
    }

    #[test]
    fn test_invalid_target_duration_rejected() {
        let source = share(SyntheticFrameSource::lively(30.0, 10.0, 160, 90));
        let generator = CandidateGenerator::new(AnalysisConfig::default());
        assert!(matches!(
            generator.generate(&source, 0.0, None),
            Err(MediaError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_determinism() {
        let source = share(SyntheticFrameSource::lively(30.0, 15.0, 160, 90));
        let generator = CandidateGenerator::new(AnalysisConfig::default());
        let first = generator.generate(&source, 15.0, None).unwrap();
        let second = generator.generate(&source, 15.0, None).unwrap();
        assert_eq!(first, second);
    }
}
