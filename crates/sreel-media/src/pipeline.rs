//! Orchestration-facing entry points.
//!
//! Two paths feed the same renderer-facing shapes: `analyze_source` scans
//! one source and selects N distinct variant cuts; `assemble_narrated_timeline`
//! builds one audio-synchronized sequence from a narration script and a
//! footage library. Degraded conditions (reused footage, unmatched entries,
//! no detected voice) are metadata, never errors.

use serde::{Deserialize, Serialize};
use sreel_models::{LibrarySegment, MatchResult, SubtitleEntry, TimelineEntry, VoiceSpan};
use tracing::info;
use uuid::Uuid;

use crate::candidates::CandidateGenerator;
use crate::config::AnalysisConfig;
use crate::error::{MediaError, MediaResult};
use crate::frame_source::{lock_source, SharedFrameSource};
use crate::matcher::{KeywordMatcher, DEFAULT_MIN_CONFIDENCE};
use crate::progress::ProgressObserver;
use crate::silence::{resolve_trimmed_duration, SilenceTrimConfig};
use crate::timeline::TimelineBuilder;
use crate::variants::{VariantCut, VariantSelector};

/// Request for a multi-variant analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Number of distinct edits to produce.
    pub variant_count: usize,
    /// Duration each variant must cover, seconds.
    pub target_duration: f64,
}

impl AnalysisRequest {
    fn validate(&self) -> MediaResult<()> {
        if self.variant_count == 0 {
            return Err(MediaError::invalid_input("variant count must be at least 1"));
        }
        if self.target_duration <= 0.0 {
            return Err(MediaError::invalid_input("target duration must be positive"));
        }
        Ok(())
    }
}

/// Result of a multi-variant analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantSelection {
    /// Correlation id for this run.
    pub run_id: Uuid,
    /// One cut per requested variant.
    pub variants: Vec<VariantCut>,
    /// Candidates that survived filtering.
    pub candidate_count: usize,
    /// Selections that reused footage across variants (degraded).
    pub reused_segment_count: usize,
}

/// Scan a source and select distinct variant cuts.
///
/// Frame decoding dominates the cost and blocks, so the scan runs on the
/// blocking pool; window scoring parallelizes internally. The observer, if
/// any, is invoked every few windows and must not block.
pub async fn analyze_source(
    source: SharedFrameSource,
    request: AnalysisRequest,
    config: AnalysisConfig,
    observer: Option<ProgressObserver>,
) -> MediaResult<VariantSelection> {
    request.validate()?;

    let source_duration = {
        let info = lock_source(&source)?.info();
        if !info.is_usable() {
            return Err(MediaError::no_usable_content(
                "source reports no decodable duration",
            ));
        }
        info.duration
    };

    let run_id = Uuid::new_v4();
    let target_duration = request.target_duration;
    let scan_config = config.clone();
    let scan_source = source.clone();

    let candidates = tokio::task::spawn_blocking(move || {
        let generator = CandidateGenerator::new(scan_config);
        generator.generate(&scan_source, target_duration, observer.as_ref())
    })
    .await
    .map_err(|e| MediaError::internal(format!("candidate scan task failed: {e}")))??;

    if candidates.is_empty() {
        metrics::counter!("sreel_runs_no_usable_content_total").increment(1);
        return Err(MediaError::no_usable_content(
            "no candidate segments survived filtering",
        ));
    }

    let selector = VariantSelector::new(config);
    let outcome = selector.select(
        &candidates,
        request.variant_count,
        request.target_duration,
        source_duration,
    )?;

    metrics::counter!("sreel_segments_reused_total")
        .increment(outcome.reused_segment_count as u64);

    info!(
        %run_id,
        candidates = candidates.len(),
        variants = outcome.variants.len(),
        reused = outcome.reused_segment_count,
        "variant selection complete"
    );

    Ok(VariantSelection {
        run_id,
        variants: outcome.variants,
        candidate_count: candidates.len(),
        reused_segment_count: outcome.reused_segment_count,
    })
}

/// Configuration for script-driven assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Silence-aware trimming parameters.
    pub silence: SilenceTrimConfig,
    /// Minimum keyword-match confidence.
    pub min_match_confidence: f64,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            silence: SilenceTrimConfig::default(),
            min_match_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

/// A fully assembled narrated timeline with degraded-condition metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarratedTimeline {
    /// Correlation id for this run.
    pub run_id: Uuid,
    /// Duration the timeline covers, after silence trimming.
    pub target_duration: f64,
    /// False when voice detection found nothing and the original duration
    /// was kept.
    pub voice_detected: bool,
    /// Placed clips in timeline order.
    pub entries: Vec<TimelineEntry>,
    /// Per-entry match results, in script order.
    pub matches: Vec<MatchResult>,
    /// Script entries that matched no keyword (degraded).
    pub unmatched_count: usize,
    /// Entries filled with fallback footage (degraded).
    pub fallback_entry_count: usize,
}

/// Build one audio-synchronized timeline from a narration script.
///
/// Pure computation: resolves the trimmed narration duration, matches each
/// subtitle entry against the library by keyword, and assembles the clip
/// sequence covering exactly that duration.
pub fn assemble_narrated_timeline(
    script: &[SubtitleEntry],
    library: &[LibrarySegment],
    voice_spans: &[VoiceSpan],
    original_duration: f64,
    config: &AssemblyConfig,
) -> MediaResult<NarratedTimeline> {
    if library.is_empty() {
        return Err(MediaError::no_usable_content("footage library is empty"));
    }

    let run_id = Uuid::new_v4();

    let trimmed = resolve_trimmed_duration(voice_spans, original_duration, &config.silence)?;

    let matcher = KeywordMatcher::new(config.min_match_confidence);
    let matches = matcher.match_entries(script, library);
    let unmatched_count = matches.iter().filter(|m| !m.is_matched()).count();

    let timeline =
        TimelineBuilder::default().build(script, &matches, library, trimmed.target_duration)?;

    metrics::counter!("sreel_subtitles_unmatched_total").increment(unmatched_count as u64);
    metrics::counter!("sreel_timeline_fallback_entries_total")
        .increment(timeline.fallback_entry_count as u64);

    info!(
        %run_id,
        entries = timeline.entries.len(),
        target_duration = trimmed.target_duration,
        voice_detected = trimmed.voice_detected,
        unmatched_count,
        "narrated timeline assembled"
    );

    Ok(NarratedTimeline {
        run_id,
        target_duration: trimmed.target_duration,
        voice_detected: trimmed.voice_detected,
        entries: timeline.entries,
        matches,
        unmatched_count,
        fallback_entry_count: timeline.fallback_entry_count,
    })
}
