//! Silence-aware narration trimming.
//!
//! Determines how long the assembled timeline must be: voice-activity spans
//! are merged across short natural pauses, padded for seamless transitions,
//! and concatenated with the silence between them removed. The resulting
//! duration is the timeline builder's target.

use serde::{Deserialize, Serialize};
use sreel_models::VoiceSpan;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Configuration for silence-aware trimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SilenceTrimConfig {
    /// Gaps shorter than this are kept as natural pauses, seconds.
    ///
    /// - Lower values (0.15s): choppier, faster-paced narration
    /// - Default (0.3s): breathing room preserved, dead air removed
    /// - Higher values (0.5s+): only long silences removed
    pub min_silence_gap: f64,

    /// Padding added to each side of a merged span, seconds.
    ///
    /// Prevents clipped word onsets and endings at cut points.
    pub span_padding: f64,

    /// Detector confidence below which spans are ignored.
    pub min_confidence: f32,
}

impl Default for SilenceTrimConfig {
    fn default() -> Self {
        Self {
            min_silence_gap: 0.3,
            span_padding: 0.08,
            min_confidence: 0.5,
        }
    }
}

impl SilenceTrimConfig {
    /// Aggressive trimming for fast-paced clips.
    pub fn aggressive() -> Self {
        Self {
            min_silence_gap: 0.15,
            span_padding: 0.05,
            min_confidence: 0.4,
        }
    }

    /// Conservative trimming that preserves more of the narration.
    pub fn conservative() -> Self {
        Self {
            min_silence_gap: 0.5,
            span_padding: 0.12,
            min_confidence: 0.6,
        }
    }

    /// Builder-style setter for the minimum silence gap.
    pub fn with_min_silence_gap(mut self, secs: f64) -> Self {
        self.min_silence_gap = secs.max(0.0);
        self
    }

    /// Builder-style setter for the span padding.
    pub fn with_span_padding(mut self, secs: f64) -> Self {
        self.span_padding = secs.max(0.0);
        self
    }

    /// Builder-style setter for the confidence threshold.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence.clamp(0.0, 1.0);
        self
    }
}

/// Trimmed narration duration with the spans that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimmedNarration {
    /// Duration the assembled timeline must cover, seconds.
    pub target_duration: f64,
    /// Merged, padded voice spans in chronological order.
    pub spans: Vec<VoiceSpan>,
    /// False when no span cleared the confidence threshold; the original
    /// duration is kept unchanged in that case.
    pub voice_detected: bool,
    /// Silence removed from the original narration, seconds.
    pub removed_silence: f64,
}

/// Resolve the trimmed narration duration from voice-activity spans.
///
/// Spans below the confidence threshold are ignored; the rest are merged
/// across gaps shorter than [`SilenceTrimConfig::min_silence_gap`] and
/// padded by [`SilenceTrimConfig::span_padding`] each side. No detected
/// voice at all keeps the original duration (degraded, not an error).
pub fn resolve_trimmed_duration(
    spans: &[VoiceSpan],
    original_duration: f64,
    config: &SilenceTrimConfig,
) -> MediaResult<TrimmedNarration> {
    if original_duration <= 0.0 {
        return Err(MediaError::invalid_input(
            "narration duration must be positive",
        ));
    }
    for span in spans {
        if span.start < 0.0 || span.end <= span.start {
            return Err(MediaError::invalid_input(format!(
                "malformed voice span {:.3}s..{:.3}s",
                span.start, span.end
            )));
        }
    }

    let mut active: Vec<VoiceSpan> = spans
        .iter()
        .filter(|s| s.confidence >= config.min_confidence)
        .map(|s| VoiceSpan {
            start: s.start.min(original_duration),
            end: s.end.min(original_duration),
            confidence: s.confidence,
        })
        .filter(|s| s.end > s.start)
        .collect();
    active.sort_by(|a, b| {
        a.start
            .partial_cmp(&b.start)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    if active.is_empty() {
        debug!(
            original_duration,
            "no voice activity above threshold, keeping original duration"
        );
        return Ok(TrimmedNarration {
            target_duration: original_duration,
            spans: Vec::new(),
            voice_detected: false,
            removed_silence: 0.0,
        });
    }

    // Merge across short natural pauses.
    let mut merged: Vec<VoiceSpan> = Vec::new();
    for span in active {
        match merged.last_mut() {
            Some(prev) if span.start - prev.end < config.min_silence_gap => {
                prev.end = prev.end.max(span.end);
                prev.confidence = prev.confidence.max(span.confidence);
            }
            _ => merged.push(span),
        }
    }

    // Pad for seamless transitions, re-merging any overlap padding creates.
    let mut padded: Vec<VoiceSpan> = Vec::new();
    for span in &merged {
        let expanded = VoiceSpan {
            start: (span.start - config.span_padding).max(0.0),
            end: (span.end + config.span_padding).min(original_duration),
            confidence: span.confidence,
        };
        match padded.last_mut() {
            Some(prev) if expanded.start <= prev.end => {
                prev.end = prev.end.max(expanded.end);
                prev.confidence = prev.confidence.max(expanded.confidence);
            }
            _ => padded.push(expanded),
        }
    }

    let kept: f64 = padded.iter().map(VoiceSpan::duration).sum();
    let target_duration = kept.min(original_duration);
    let removed_silence = (original_duration - target_duration).max(0.0);

    debug!(
        original_duration,
        target_duration,
        removed_silence,
        spans = padded.len(),
        "narration trimmed"
    );

    Ok(TrimmedNarration {
        target_duration,
        spans: padded,
        voice_detected: true,
        removed_silence,
    })
}
