//! Multi-variant segment selection.
//!
//! Given the scored candidate list, produces N distinct edits of the source:
//! each variant is a chronological sequence of non-overlapping, visually
//! distinct segments summing to at least the target duration. Variant `i`
//! opens inside zone `i` of the timeline so no two variants start on the
//! same footage, and filler is drawn round-robin from time-ordered buckets
//! so selections spread across the source instead of clustering around the
//! top-scored region.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use sreel_models::VideoSegment;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::{MediaError, MediaResult};
use crate::phash;

/// One complete alternative edit of the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantCut {
    /// Selected segments in chronological order.
    pub segments: Vec<VideoSegment>,
    /// Accumulated footage duration, seconds.
    pub total_duration: f64,
}

/// Result of a selection run, with degraded-condition metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOutcome {
    /// One cut per requested variant.
    pub variants: Vec<VariantCut>,
    /// Selections that reused footage already taken by an earlier variant.
    ///
    /// Non-zero when the source has fewer usable candidates than the
    /// requested variants need. Degraded, not an error.
    pub reused_segment_count: usize,
}

/// Greedy, deterministic multi-variant selector.
pub struct VariantSelector {
    config: AnalysisConfig,
}

impl VariantSelector {
    /// Create a selector with the given configuration.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Select `variant_count` distinct cuts from `candidates`.
    ///
    /// `candidates` must be sorted by combined score descending (the
    /// candidate generator's output order); the greedy passes below take
    /// the first acceptable candidate they see.
    pub fn select(
        &self,
        candidates: &[VideoSegment],
        variant_count: usize,
        target_duration: f64,
        source_duration: f64,
    ) -> MediaResult<SelectionOutcome> {
        if variant_count == 0 {
            return Err(MediaError::invalid_input("variant count must be at least 1"));
        }
        if target_duration <= 0.0 {
            return Err(MediaError::invalid_input("target duration must be positive"));
        }
        if source_duration <= 0.0 {
            return Err(MediaError::invalid_input("source duration must be positive"));
        }
        if candidates.is_empty() {
            return Err(MediaError::no_usable_content("candidate list is empty"));
        }

        let zone_length = source_duration / variant_count as f64;
        let mut used: HashSet<usize> = HashSet::new();
        let mut reused_segment_count = 0usize;
        let mut variants = Vec::with_capacity(variant_count);

        for variant_index in 0..variant_count {
            let zone_start = variant_index as f64 * zone_length;
            let zone_end = zone_start + zone_length;

            let mut selected: Vec<usize> = Vec::new();
            let mut accumulated = 0.0;

            let opener = self.pick_opener(candidates, &used, zone_start, zone_end);
            if used.contains(&opener) {
                reused_segment_count += 1;
            }
            selected.push(opener);
            accumulated += candidates[opener].duration();

            // Fill the remainder: unused candidates first, then (degraded)
            // footage already taken by earlier variants.
            for allow_reuse in [false, true] {
                if accumulated + 1e-9 >= target_duration {
                    break;
                }
                let taken = self.fill_round_robin(
                    candidates,
                    &mut selected,
                    &mut accumulated,
                    &used,
                    allow_reuse,
                    target_duration,
                    source_duration,
                );
                if allow_reuse {
                    reused_segment_count += taken;
                }
            }

            if accumulated + 1e-9 < target_duration {
                debug!(
                    variant = variant_index,
                    accumulated,
                    target = target_duration,
                    "variant fell short of target duration"
                );
            }

            for &index in &selected {
                used.insert(index);
            }

            let mut segments: Vec<VideoSegment> =
                selected.iter().map(|&i| candidates[i].clone()).collect();
            segments.sort_by(|a, b| {
                a.start_time
                    .partial_cmp(&b.start_time)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            variants.push(VariantCut {
                segments,
                total_duration: accumulated,
            });
        }

        Ok(SelectionOutcome {
            variants,
            reused_segment_count,
        })
    }

    /// Opening segment for a variant: best unused candidate inside the
    /// variant's zone, falling back to the first unused candidate anywhere,
    /// and finally (all candidates taken) to the best candidate overall.
    fn pick_opener(
        &self,
        candidates: &[VideoSegment],
        used: &HashSet<usize>,
        zone_start: f64,
        zone_end: f64,
    ) -> usize {
        let usable = |segment: &VideoSegment| segment.motion_score >= self.config.min_motion_floor;

        candidates
            .iter()
            .enumerate()
            .find(|(i, c)| {
                !used.contains(i) && usable(c) && c.start_time >= zone_start && c.start_time < zone_end
            })
            .or_else(|| {
                candidates
                    .iter()
                    .enumerate()
                    .find(|(i, c)| !used.contains(i) && usable(c))
            })
            .or_else(|| {
                candidates
                    .iter()
                    .enumerate()
                    .find(|(i, _)| !used.contains(i))
            })
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Consume bucketed candidates round-robin until the variant covers the
    /// target duration or the pool runs dry. Returns how many selections
    /// were taken from already-used footage.
    #[allow(clippy::too_many_arguments)]
    fn fill_round_robin(
        &self,
        candidates: &[VideoSegment],
        selected: &mut Vec<usize>,
        accumulated: &mut f64,
        used: &HashSet<usize>,
        allow_reuse: bool,
        target_duration: f64,
        source_duration: f64,
    ) -> usize {
        let mut buckets = self.bucket_pool(candidates, selected, used, allow_reuse, source_duration);
        let mut taken = 0usize;

        'rounds: loop {
            let mut advanced = false;
            for bucket in buckets.iter_mut() {
                if *accumulated + 1e-9 >= target_duration {
                    break 'rounds;
                }
                while let Some(index) = bucket.pop_front() {
                    if self.accepts(&candidates[index], selected, candidates) {
                        selected.push(index);
                        *accumulated += candidates[index].duration();
                        taken += 1;
                        advanced = true;
                        break;
                    }
                }
            }
            if !advanced {
                break;
            }
        }

        taken
    }

    /// Partition the remaining pool into time-ordered buckets spanning the
    /// source. Bucket contents keep the candidate list's score ordering.
    fn bucket_pool(
        &self,
        candidates: &[VideoSegment],
        selected: &[usize],
        used: &HashSet<usize>,
        allow_reuse: bool,
        source_duration: f64,
    ) -> Vec<VecDeque<usize>> {
        let count = self.config.bucket_count.max(1);
        let mut buckets = vec![VecDeque::new(); count];

        for (index, candidate) in candidates.iter().enumerate() {
            if selected.contains(&index) {
                continue;
            }
            if used.contains(&index) != allow_reuse {
                continue;
            }
            let slot = ((candidate.start_time / source_duration) * count as f64).floor() as usize;
            buckets[slot.min(count - 1)].push_back(index);
        }

        buckets
    }

    /// Whether a candidate can join the variant being built.
    fn accepts(
        &self,
        candidate: &VideoSegment,
        selected: &[usize],
        candidates: &[VideoSegment],
    ) -> bool {
        if candidate.motion_score < self.config.min_motion_floor {
            return false;
        }
        for &index in selected {
            let existing = &candidates[index];
            if candidate.overlaps(existing) {
                return false;
            }
            if phash::are_similar(
                &candidate.fingerprints,
                &existing.fingerprints,
                self.config.hamming_threshold,
                self.config.similarity_fraction,
            ) {
                return false;
            }
        }
        true
    }
}
