#![deny(unreachable_patterns)]
//! Footage analysis, variant selection, and timeline assembly.
//!
//! This crate provides:
//! - Frame sampling and motion/variance/brightness scoring over analysis windows
//! - DCT-based perceptual fingerprints for duplicate-footage detection
//! - A full-source candidate scan with dead-zone and near-black filtering
//! - A deterministic multi-variant selector producing distinct edits
//! - Keyword matching of narration subtitles against a footage library
//! - Silence-aware narration trimming and continuous timeline assembly
//!
//! Media decoding stays behind the [`frame_source::FrameSource`] trait; the
//! optional `opencv` feature ships one concrete backend. Rendering, muxing,
//! and persistence belong to external collaborators.

pub mod candidates;
pub mod config;
pub mod error;
pub mod frame_source;
pub mod matcher;
pub mod phash;
pub mod pipeline;
pub mod progress;
pub mod sampler;
pub mod scorer;
pub mod silence;
pub mod testing;
pub mod timeline;
pub mod variants;

pub use candidates::CandidateGenerator;
pub use config::AnalysisConfig;
pub use error::{MediaError, MediaResult};
pub use frame_source::{share, Frame, FrameSource, SharedFrameSource, SourceInfo};
pub use matcher::KeywordMatcher;
pub use pipeline::{
    analyze_source, assemble_narrated_timeline, AnalysisRequest, AssemblyConfig, NarratedTimeline,
    VariantSelection,
};
pub use progress::{ProgressObserver, ScanProgress};
pub use silence::{resolve_trimmed_duration, SilenceTrimConfig, TrimmedNarration};
pub use timeline::{AssembledTimeline, TimelineBuilder};
pub use variants::{SelectionOutcome, VariantCut, VariantSelector};

#[cfg(feature = "opencv")]
pub use frame_source::OpenCvFrameSource;
