//! Timeline assembly from keyword matches.
//!
//! Converts the ordered match list into a continuous clip sequence covering
//! exactly the target duration: matched library segments fill their
//! subtitle's span, unmatched spans fall back to the library's first
//! segment, and a tail entry closes any remaining gap.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sreel_models::{LibrarySegment, MatchResult, SubtitleEntry, TimelineEntry};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Tolerance on the assembled duration, seconds.
pub const DURATION_EPSILON: f64 = 0.01;

/// A fully assembled clip sequence with degraded-condition metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledTimeline {
    /// Placed clips in timeline order.
    pub entries: Vec<TimelineEntry>,
    /// Total assembled duration, seconds. Equals the target within
    /// [`DURATION_EPSILON`].
    pub total_duration: f64,
    /// Entries that used fallback footage (unmatched spans plus any tail
    /// gap filler).
    pub fallback_entry_count: usize,
    /// Entries shortened or skipped because the narration outran the
    /// trimmed target duration.
    pub truncated_entry_count: usize,
}

/// Builds a continuous timeline from matches and a target duration.
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    epsilon: f64,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self {
            epsilon: DURATION_EPSILON,
        }
    }
}

impl TimelineBuilder {
    /// Build the timeline for `script` using `matches` against `library`.
    ///
    /// `matches` must be the matcher's output for `script`, in order. The
    /// library's first segment serves as fallback footage for unmatched
    /// spans and the tail gap.
    pub fn build(
        &self,
        script: &[SubtitleEntry],
        matches: &[MatchResult],
        library: &[LibrarySegment],
        target_duration: f64,
    ) -> MediaResult<AssembledTimeline> {
        if target_duration <= 0.0 {
            return Err(MediaError::invalid_input("target duration must be positive"));
        }
        if matches.len() != script.len() {
            return Err(MediaError::invalid_input(format!(
                "{} matches for {} script entries",
                matches.len(),
                script.len()
            )));
        }
        let Some(fallback) = library.first() else {
            return Err(MediaError::no_usable_content("footage library is empty"));
        };

        let by_id: HashMap<&str, &LibrarySegment> =
            library.iter().map(|s| (s.id.as_str(), s)).collect();

        let mut entries = Vec::with_capacity(script.len() + 1);
        let mut cursor = 0.0_f64;
        let mut fallback_entry_count = 0usize;
        let mut truncated_entry_count = 0usize;

        for (entry, result) in script.iter().zip(matches) {
            if entry.duration() <= 0.0 {
                return Err(MediaError::invalid_input(format!(
                    "subtitle entry {} has a malformed time range",
                    entry.index
                )));
            }

            let remaining = target_duration - cursor;
            if remaining <= self.epsilon {
                // Narration outran the trimmed target; the rest is dropped.
                truncated_entry_count += 1;
                continue;
            }

            let mut required = entry.duration();
            if required > remaining {
                required = remaining;
                truncated_entry_count += 1;
            }

            let segment = match &result.matched_segment_id {
                Some(id) => *by_id.get(id.as_str()).ok_or_else(|| {
                    MediaError::invalid_input(format!(
                        "match for entry {} references unknown segment '{id}'",
                        entry.index
                    ))
                })?,
                None => {
                    fallback_entry_count += 1;
                    fallback
                }
            };

            entries.push(place(segment, cursor, required));
            cursor += required;
        }

        // Close any remaining gap with fallback footage.
        if cursor + self.epsilon < target_duration {
            let gap = target_duration - cursor;
            entries.push(place(fallback, cursor, gap));
            fallback_entry_count += 1;
            cursor += gap;
        }

        let total_duration = cursor;
        if (total_duration - target_duration).abs() > self.epsilon {
            return Err(MediaError::internal(format!(
                "assembled duration {total_duration:.3}s drifted from target {target_duration:.3}s"
            )));
        }

        debug!(
            entries = entries.len(),
            total_duration,
            fallback_entry_count,
            truncated_entry_count,
            "timeline assembled"
        );

        Ok(AssembledTimeline {
            entries,
            total_duration,
            fallback_entry_count,
            truncated_entry_count,
        })
    }
}

/// Place a library segment into a timeline slot.
///
/// A segment long enough for the slot is trimmed from its in-point; a
/// shorter one is used whole and the renderer loops or holds its last frame.
fn place(segment: &LibrarySegment, timeline_start: f64, slot: f64) -> TimelineEntry {
    let out_point = if segment.duration() >= slot {
        segment.in_time + slot
    } else {
        segment.out_time
    };

    TimelineEntry {
        source: segment.source.clone(),
        in_point: segment.in_time,
        out_point,
        timeline_start,
        timeline_duration: slot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::KeywordMatcher;

    fn entry(index: usize, text: &str, start: f64, end: f64) -> SubtitleEntry {
        SubtitleEntry {
            index,
            text: text.into(),
            start_time: start,
            end_time: end,
        }
    }

    fn segment(id: &str, duration: f64, keywords: &[&str]) -> LibrarySegment {
        LibrarySegment {
            id: id.into(),
            source: format!("footage/{id}.mp4"),
            in_time: 1.0,
            out_time: 1.0 + duration,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn build(
        script: &[SubtitleEntry],
        library: &[LibrarySegment],
        target: f64,
    ) -> AssembledTimeline {
        let matches = KeywordMatcher::default().match_entries(script, library);
        TimelineBuilder::default()
            .build(script, &matches, library, target)
            .unwrap()
    }

    #[test]
    fn test_duration_exactness() {
        let library = vec![
            segment("a", 10.0, &["product"]),
            segment("b", 10.0, &["team"]),
        ];
        let script = vec![
            entry(0, "our product is here", 0.0, 2.5),
            entry(1, "meet the team", 2.5, 5.0),
            entry(2, "nothing matching", 5.0, 7.0),
        ];

        let timeline = build(&script, &library, 7.0);
        let total: f64 = timeline.entries.iter().map(|e| e.timeline_duration).sum();
        assert!((total - 7.0).abs() <= DURATION_EPSILON);
        assert!((timeline.total_duration - 7.0).abs() <= DURATION_EPSILON);
    }

    #[test]
    fn test_entries_are_ordered_and_contiguous() {
        let library = vec![segment("a", 10.0, &["product"])];
        let script = vec![
            entry(0, "the product", 0.0, 2.0),
            entry(1, "the product again", 2.0, 4.0),
        ];

        let timeline = build(&script, &library, 4.0);
        let mut cursor = 0.0;
        for placed in &timeline.entries {
            assert!((placed.timeline_start - cursor).abs() < 1e-9);
            cursor += placed.timeline_duration;
        }
    }

    #[test]
    fn test_matched_segment_trimmed_to_span() {
        let library = vec![segment("a", 10.0, &["product"])];
        let script = vec![entry(0, "the product", 0.0, 2.0)];

        let timeline = build(&script, &library, 2.0);
        let placed = &timeline.entries[0];
        assert_eq!(placed.source, "footage/a.mp4");
        assert!((placed.in_point - 1.0).abs() < 1e-9);
        assert!((placed.out_point - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_segment_used_whole() {
        let library = vec![
            segment("fallback", 10.0, &[]),
            segment("short", 1.0, &["demo"]),
        ];
        let script = vec![entry(0, "long demo narration", 0.0, 3.0)];

        let timeline = build(&script, &library, 3.0);
        let placed = &timeline.entries[0];
        assert_eq!(placed.source, "footage/short.mp4");
        // Whole segment, slot still spans the narration.
        assert!((placed.source_duration() - 1.0).abs() < 1e-9);
        assert!((placed.timeline_duration - 3.0).abs() < 1e-9);
        assert!(placed.needs_hold());
    }

    #[test]
    fn test_unmatched_spans_use_fallback() {
        let library = vec![
            segment("fb", 20.0, &["product"]),
            segment("x", 5.0, &["demo"]),
        ];
        let script = vec![
            entry(0, "watch the demo", 0.0, 2.0),
            entry(1, "totally unrelated", 2.0, 4.0),
        ];

        let timeline = build(&script, &library, 4.0);
        assert_eq!(timeline.entries[1].source, "footage/fb.mp4");
        assert_eq!(timeline.fallback_entry_count, 1);
    }

    #[test]
    fn test_tail_gap_closed_with_fallback() {
        let library = vec![segment("fb", 30.0, &["product"])];
        let script = vec![entry(0, "the product", 0.0, 2.0)];

        // Narration spans 2s but the target is 5s: a tail entry closes it.
        let timeline = build(&script, &library, 5.0);
        assert_eq!(timeline.entries.len(), 2);
        let tail = timeline.entries.last().unwrap();
        assert_eq!(tail.source, "footage/fb.mp4");
        assert!((tail.timeline_duration - 3.0).abs() < 1e-9);
        assert!((timeline.total_duration - 5.0).abs() <= DURATION_EPSILON);
    }

    #[test]
    fn test_overrunning_script_is_truncated_to_target() {
        let library = vec![segment("a", 30.0, &["product"])];
        let script = vec![
            entry(0, "the product", 0.0, 3.0),
            entry(1, "the product more", 3.0, 6.0),
            entry(2, "the product still", 6.0, 9.0),
        ];

        // Silence trimming shortened the narration to 5s.
        let timeline = build(&script, &library, 5.0);
        assert!((timeline.total_duration - 5.0).abs() <= DURATION_EPSILON);
        assert!(timeline.truncated_entry_count >= 1);
    }

    #[test]
    fn test_empty_library_is_fatal() {
        let script = vec![entry(0, "anything", 0.0, 2.0)];
        let matches = vec![MatchResult::unmatched(0)];
        let result = TimelineBuilder::default().build(&script, &matches, &[], 2.0);
        assert!(matches!(result, Err(MediaError::NoUsableContent(_))));
    }

    #[test]
    fn test_malformed_span_is_invalid_input() {
        let library = vec![segment("a", 5.0, &[])];
        let script = vec![entry(0, "anything", 2.0, 1.0)];
        let matches = vec![MatchResult::unmatched(0)];
        let result = TimelineBuilder::default().build(&script, &matches, &library, 2.0);
        assert!(matches!(result, Err(MediaError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_script_fills_target_with_fallback() {
        let library = vec![segment("fb", 30.0, &[])];
        let timeline = TimelineBuilder::default()
            .build(&[], &[], &library, 6.0)
            .unwrap();
        assert_eq!(timeline.entries.len(), 1);
        assert!((timeline.total_duration - 6.0).abs() <= DURATION_EPSILON);
    }
}
