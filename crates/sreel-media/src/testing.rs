//! Synthetic frame sources for tests and benches.
//!
//! Frames are rendered procedurally from the frame index, so sources are
//! fully deterministic: the same index always decodes to the same pixels.

use std::f32::consts::TAU;

use crate::error::MediaResult;
use crate::frame_source::{Frame, FrameSource, SourceInfo};

/// One procedurally rendered scene.
///
/// Renders a sinusoidal stripe pattern; `shift_per_frame` scrolls the
/// pattern so consecutive frames differ, `stripe_period` and orientation
/// shape the perceptual fingerprint.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticScene {
    /// First frame of the scene (inclusive).
    pub start_frame: u64,
    /// Last frame of the scene (exclusive).
    pub end_frame: u64,
    /// Base luma level, 0-255.
    pub base_level: u8,
    /// Stripe amplitude around the base level.
    pub amplitude: u8,
    /// Stripe period in pixels.
    pub stripe_period: u32,
    /// Pattern scroll per frame in pixels; 0 renders a static shot.
    pub shift_per_frame: u32,
    /// Vertical stripes instead of horizontal.
    pub vertical: bool,
}

/// Deterministic in-memory frame source.
pub struct SyntheticFrameSource {
    info: SourceInfo,
    scenes: Vec<SyntheticScene>,
    undecodable: Vec<u64>,
}

impl SyntheticFrameSource {
    /// Create an empty source; frames outside any scene render flat black.
    pub fn new(fps: f64, duration: f64, width: u32, height: u32) -> Self {
        let frame_count = (fps * duration).round() as u64;
        Self {
            info: SourceInfo {
                fps,
                frame_count,
                duration,
                width,
                height,
                rotation: 0,
            },
            scenes: Vec::new(),
            undecodable: Vec::new(),
        }
    }

    /// Add a scene.
    pub fn with_scene(mut self, scene: SyntheticScene) -> Self {
        self.scenes.push(scene);
        self
    }

    /// Mark frame indices as undecodable (simulated decode failures).
    pub fn with_undecodable(mut self, frames: Vec<u64>) -> Self {
        self.undecodable = frames;
        self
    }

    /// Uniformly lively footage across the whole source.
    pub fn lively(fps: f64, duration: f64, width: u32, height: u32) -> Self {
        let source = Self::new(fps, duration, width, height);
        let frame_count = source.info.frame_count;
        source.with_scene(SyntheticScene {
            start_frame: 0,
            end_frame: frame_count,
            base_level: 110,
            amplitude: 90,
            stripe_period: 24,
            shift_per_frame: 5,
            vertical: false,
        })
    }

    /// A single static, near-black shot.
    pub fn static_dark(fps: f64, duration: f64, width: u32, height: u32) -> Self {
        let source = Self::new(fps, duration, width, height);
        let frame_count = source.info.frame_count;
        source.with_scene(SyntheticScene {
            start_frame: 0,
            end_frame: frame_count,
            base_level: 8,
            amplitude: 4,
            stripe_period: 16,
            shift_per_frame: 0,
            vertical: false,
        })
    }

    fn scene_at(&self, index: u64) -> Option<&SyntheticScene> {
        self.scenes
            .iter()
            .find(|s| index >= s.start_frame && index < s.end_frame)
    }

    fn render(&self, index: u64) -> Frame {
        let width = self.info.width;
        let height = self.info.height;
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);

        match self.scene_at(index) {
            Some(scene) => {
                let shift = (index - scene.start_frame) as u32 * scene.shift_per_frame;
                let period = scene.stripe_period.max(2) as f32;
                for y in 0..height {
                    for x in 0..width {
                        let along = if scene.vertical { y } else { x };
                        let phase = ((along + shift) as f32 / period) * TAU;
                        let luma = scene.base_level as f32 + scene.amplitude as f32 * phase.sin();
                        let luma = luma.clamp(0.0, 255.0) as u8;
                        data.extend_from_slice(&[luma, luma, luma]);
                    }
                }
            }
            None => data.resize(width as usize * height as usize * 3, 0),
        }

        Frame {
            width,
            height,
            data,
        }
    }
}

impl FrameSource for SyntheticFrameSource {
    fn info(&self) -> SourceInfo {
        self.info
    }

    fn read_frame(&mut self, index: u64) -> MediaResult<Option<Frame>> {
        if index >= self.info.frame_count || self.undecodable.contains(&index) {
            return Ok(None);
        }
        Ok(Some(self.render(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendering_is_deterministic() {
        let mut source = SyntheticFrameSource::lively(30.0, 5.0, 64, 36);
        let a = source.read_frame(42).unwrap().unwrap();
        let b = source.read_frame(42).unwrap().unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn test_moving_scene_changes_between_frames() {
        let mut source = SyntheticFrameSource::lively(30.0, 5.0, 64, 36);
        let a = source.read_frame(0).unwrap().unwrap();
        let b = source.read_frame(1).unwrap().unwrap();
        assert_ne!(a.data, b.data);
    }

    #[test]
    fn test_static_scene_repeats_exactly() {
        let mut source = SyntheticFrameSource::static_dark(30.0, 5.0, 64, 36);
        let a = source.read_frame(0).unwrap().unwrap();
        let b = source.read_frame(100).unwrap().unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn test_out_of_range_and_undecodable_frames() {
        let mut source =
            SyntheticFrameSource::lively(30.0, 1.0, 64, 36).with_undecodable(vec![3]);
        assert!(source.read_frame(3).unwrap().is_none());
        assert!(source.read_frame(10_000).unwrap().is_none());
    }
}
