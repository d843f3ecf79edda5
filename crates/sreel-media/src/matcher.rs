//! Keyword matching between narration text and the footage library.
//!
//! A greedy per-entry matcher: each subtitle entry is matched independently
//! against every library keyword, so one library segment may serve several
//! entries. Whole-token matches outrank substring matches; ties go to the
//! segment with more usable footage.

use sreel_models::{LibrarySegment, MatchResult, SubtitleEntry};
use tracing::debug;

/// Confidence of a word-boundary keyword match.
pub const WHOLE_WORD_CONFIDENCE: f64 = 1.0;

/// Confidence of a substring-only keyword match.
pub const SUBSTRING_CONFIDENCE: f64 = 0.7;

/// Default minimum confidence for accepting a match.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.3;

/// Matches narration entries to keyword-tagged library segments.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    min_confidence: f64,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl KeywordMatcher {
    /// Create a matcher with a custom minimum confidence.
    pub fn new(min_confidence: f64) -> Self {
        Self {
            min_confidence: min_confidence.clamp(0.0, 1.0),
        }
    }

    /// Match every entry, in order.
    pub fn match_entries(
        &self,
        entries: &[SubtitleEntry],
        library: &[LibrarySegment],
    ) -> Vec<MatchResult> {
        let results: Vec<MatchResult> = entries
            .iter()
            .map(|entry| self.match_entry(entry, library))
            .collect();

        let unmatched = results.iter().filter(|r| !r.is_matched()).count();
        debug!(
            entries = entries.len(),
            unmatched, "keyword matching complete"
        );

        results
    }

    /// Match a single entry against the library.
    pub fn match_entry(&self, entry: &SubtitleEntry, library: &[LibrarySegment]) -> MatchResult {
        let text = entry.text.to_lowercase();

        // (confidence, segment duration, segment, original keyword)
        let mut best: Option<(f64, f64, &LibrarySegment, &str)> = None;

        for segment in library {
            for keyword in &segment.keywords {
                let trimmed = keyword.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let Some(confidence) = keyword_confidence(&text, &trimmed.to_lowercase()) else {
                    continue;
                };

                let better = match best {
                    None => true,
                    Some((best_confidence, best_duration, _, _)) => {
                        confidence > best_confidence
                            || (confidence == best_confidence
                                && segment.duration() > best_duration)
                    }
                };
                if better {
                    best = Some((confidence, segment.duration(), segment, trimmed));
                }
            }
        }

        match best {
            Some((confidence, _, segment, keyword)) if confidence >= self.min_confidence => {
                MatchResult {
                    entry_index: entry.index,
                    matched_segment_id: Some(segment.id.clone()),
                    matched_keyword: Some(keyword.to_string()),
                    confidence,
                }
            }
            _ => MatchResult::unmatched(entry.index),
        }
    }
}

/// Confidence of `keyword` occurring in `text`, both lowercased.
///
/// Any occurrence bounded by non-alphanumeric characters (or the ends of the
/// text) is a whole-token match; otherwise a bare substring occurrence
/// scores lower. Multi-word keywords get word-boundary treatment too.
fn keyword_confidence(text: &str, keyword: &str) -> Option<f64> {
    let mut found = false;
    for (index, _) in text.match_indices(keyword) {
        found = true;
        let before_ok = text[..index]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[index + keyword.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(WHOLE_WORD_CONFIDENCE);
        }
    }
    found.then_some(SUBSTRING_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize, text: &str) -> SubtitleEntry {
        SubtitleEntry {
            index,
            text: text.into(),
            start_time: index as f64 * 2.0,
            end_time: index as f64 * 2.0 + 2.0,
        }
    }

    fn segment(id: &str, duration: f64, keywords: &[&str]) -> LibrarySegment {
        LibrarySegment {
            id: id.into(),
            source: format!("footage/{id}.mp4"),
            in_time: 0.0,
            out_time: duration,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_whole_word_match_scores_full_confidence() {
        let matcher = KeywordMatcher::default();
        let library = vec![segment("a", 5.0, &["product"])];
        let result = matcher.match_entry(&entry(0, "Our product ships today"), &library);

        assert_eq!(result.matched_segment_id.as_deref(), Some("a"));
        assert_eq!(result.matched_keyword.as_deref(), Some("product"));
        assert_eq!(result.confidence, WHOLE_WORD_CONFIDENCE);
    }

    #[test]
    fn test_substring_match_scores_lower() {
        let matcher = KeywordMatcher::default();
        let library = vec![segment("a", 5.0, &["product"])];
        let result = matcher.match_entry(&entry(0, "our production pipeline"), &library);

        assert_eq!(result.matched_segment_id.as_deref(), Some("a"));
        assert_eq!(result.confidence, SUBSTRING_CONFIDENCE);
    }

    #[test]
    fn test_whole_word_beats_substring() {
        let matcher = KeywordMatcher::default();
        let library = vec![
            segment("sub", 20.0, &["product"]),
            segment("word", 3.0, &["pipeline"]),
        ];
        // "production" only contains "product"; "pipeline" matches whole.
        let result = matcher.match_entry(&entry(0, "our production pipeline"), &library);

        assert_eq!(result.matched_segment_id.as_deref(), Some("word"));
        assert_eq!(result.confidence, WHOLE_WORD_CONFIDENCE);
    }

    #[test]
    fn test_tie_goes_to_longer_segment() {
        let matcher = KeywordMatcher::default();
        let library = vec![
            segment("short", 3.0, &["demo"]),
            segment("long", 8.0, &["demo"]),
        ];
        let result = matcher.match_entry(&entry(0, "watch the demo"), &library);
        assert_eq!(result.matched_segment_id.as_deref(), Some("long"));
    }

    #[test]
    fn test_no_match_yields_unmatched() {
        let matcher = KeywordMatcher::default();
        let library = vec![segment("a", 5.0, &["product"])];
        let result = matcher.match_entry(&entry(2, "completely unrelated words"), &library);

        assert!(!result.is_matched());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.entry_index, 2);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let matcher = KeywordMatcher::default();
        let library = vec![segment("a", 5.0, &["Product"])];
        let result = matcher.match_entry(&entry(0, "PRODUCT launch"), &library);
        assert_eq!(result.confidence, WHOLE_WORD_CONFIDENCE);
    }

    #[test]
    fn test_multi_word_keyword() {
        let matcher = KeywordMatcher::default();
        let library = vec![segment("a", 5.0, &["launch day"])];
        let result = matcher.match_entry(&entry(0, "it is launch day at last"), &library);
        assert_eq!(result.confidence, WHOLE_WORD_CONFIDENCE);
    }

    #[test]
    fn test_same_segment_can_serve_multiple_entries() {
        let matcher = KeywordMatcher::default();
        let library = vec![segment("a", 5.0, &["product"])];
        let entries = vec![
            entry(0, "the product is fast"),
            entry(1, "the product is small"),
        ];
        let results = matcher.match_entries(&entries, &library);
        assert!(results.iter().all(|r| r.matched_segment_id.as_deref() == Some("a")));
    }

    #[test]
    fn test_confidence_bounds() {
        let matcher = KeywordMatcher::default();
        let library = vec![
            segment("a", 5.0, &["product", "demo"]),
            segment("b", 4.0, &["launch"]),
        ];
        let entries = vec![
            entry(0, "product demo"),
            entry(1, "our launches"),
            entry(2, "nothing relevant"),
        ];
        for result in matcher.match_entries(&entries, &library) {
            assert!(
                result.confidence == 0.0
                    || (DEFAULT_MIN_CONFIDENCE..=1.0).contains(&result.confidence)
            );
            if result.is_matched() {
                assert!(result.confidence >= DEFAULT_MIN_CONFIDENCE);
            }
        }
    }
}
