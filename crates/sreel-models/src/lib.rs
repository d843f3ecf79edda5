//! Shared data models for the ScriptReel assembly core.
//!
//! This crate provides Serde-serializable types for:
//! - Scored footage segments produced by video analysis
//! - Library segments (pre-cut, keyword-tagged footage)
//! - Narration subtitles and keyword match results
//! - Assembled timeline entries handed to the renderer
//! - Voice-activity spans used for silence-aware trimming

pub mod library;
pub mod matching;
pub mod segment;
pub mod subtitle;
pub mod timeline;
pub mod timestamp;
pub mod voice;

// Re-export common types
pub use library::LibrarySegment;
pub use matching::MatchResult;
pub use segment::VideoSegment;
pub use subtitle::SubtitleEntry;
pub use timeline::TimelineEntry;
pub use timestamp::{format_clock, parse_clock, validate_span, ClockError};
pub use voice::VoiceSpan;
