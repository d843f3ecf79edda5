//! Narration subtitle entries.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One narration phrase with its spoken time span.
///
/// Produced externally from narration timing data (the subtitle generator is
/// a collaborator, not part of this core).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubtitleEntry {
    /// Position of this entry within the script, starting at 0.
    pub index: usize,
    /// Spoken text of the phrase.
    pub text: String,
    /// Start of the spoken span, seconds.
    pub start_time: f64,
    /// End of the spoken span, seconds.
    pub end_time: f64,
}

impl SubtitleEntry {
    /// Spoken duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let entry = SubtitleEntry {
            index: 0,
            text: "our product ships today".into(),
            start_time: 1.2,
            end_time: 3.7,
        };
        assert!((entry.duration() - 2.5).abs() < 1e-9);
    }
}
