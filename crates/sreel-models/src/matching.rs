//! Keyword match results for narration entries.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of matching one subtitle entry against the footage library.
///
/// `confidence` is 0.0 for unmatched entries; whenever `matched_segment_id`
/// is present, confidence is at or above the matcher's configured minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchResult {
    /// Index of the subtitle entry this result belongs to.
    pub entry_index: usize,
    /// Library segment chosen for the entry, if any keyword matched.
    pub matched_segment_id: Option<String>,
    /// The keyword that produced the winning match.
    pub matched_keyword: Option<String>,
    /// Match confidence in [0, 1]. 0.0 means unmatched.
    pub confidence: f64,
}

impl MatchResult {
    /// An explicit "no match" result for the given entry.
    pub fn unmatched(entry_index: usize) -> Self {
        Self {
            entry_index,
            matched_segment_id: None,
            matched_keyword: None,
            confidence: 0.0,
        }
    }

    /// Whether a library segment was matched.
    pub fn is_matched(&self) -> bool {
        self.matched_segment_id.is_some()
    }
}
