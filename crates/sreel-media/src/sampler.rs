//! Frame sampling and preprocessing for window scoring.
//!
//! Frames are sampled evenly across an analysis window, converted to
//! grayscale, downscaled to a small grid, and blurred. Differencing on the
//! blurred grid is what makes the motion score robust against sensor noise.

use image::{imageops, GrayImage, RgbImage};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::{MediaError, MediaResult};
use crate::frame_source::{Frame, FrameSource};

/// Sample and preprocess frames across `[start_frame, end_frame)`.
///
/// Frames that fail to decode are skipped; an empty result means the whole
/// window is undecodable and scores as a dead zone.
pub fn sample_window(
    source: &mut dyn FrameSource,
    start_frame: u64,
    end_frame: u64,
    config: &AnalysisConfig,
) -> MediaResult<Vec<GrayImage>> {
    if end_frame <= start_frame {
        return Err(MediaError::invalid_input(format!(
            "window [{start_frame}, {end_frame}) is empty"
        )));
    }

    let span = end_frame - start_frame;
    let count = config.sample_count.max(1) as u64;

    // Evenly spaced positions; short windows just take every frame.
    let positions: Vec<u64> = if span <= count {
        (start_frame..end_frame).collect()
    } else {
        (0..count)
            .map(|i| start_frame + (i as f64 * span as f64 / count as f64) as u64)
            .collect()
    };

    let mut samples = Vec::with_capacity(positions.len());
    let mut skipped = 0usize;

    for position in positions {
        match source.read_frame(position)? {
            Some(frame) => samples.push(preprocess(frame, config)?),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(
            start_frame,
            end_frame, skipped, "skipped undecodable samples in window"
        );
    }

    Ok(samples)
}

/// Grayscale, downscale, and blur one frame for scoring.
fn preprocess(frame: Frame, config: &AnalysisConfig) -> MediaResult<GrayImage> {
    let width = frame.width;
    let height = frame.height;
    let rgb = RgbImage::from_raw(width, height, frame.data)
        .ok_or_else(|| MediaError::decode_failed("frame buffer does not match dimensions"))?;

    let gray = imageops::grayscale(&rgb);

    let grid_width = config.analysis_grid_width.max(8);
    let grid_height = (((height as f64 / width.max(1) as f64) * grid_width as f64).round() as u32)
        .max(1);
    let small = imageops::resize(&gray, grid_width, grid_height, imageops::FilterType::Nearest);

    if config.blur_sigma > 0.0 {
        Ok(imageops::blur(&small, config.blur_sigma))
    } else {
        Ok(small)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SyntheticFrameSource;

    #[test]
    fn test_sample_count_matches_config() {
        let mut source = SyntheticFrameSource::lively(30.0, 10.0, 160, 90);
        let config = AnalysisConfig::default();
        let samples = sample_window(&mut source, 0, 90, &config).unwrap();
        assert_eq!(samples.len(), config.sample_count);
    }

    #[test]
    fn test_short_window_takes_every_frame() {
        let mut source = SyntheticFrameSource::lively(30.0, 10.0, 160, 90);
        let config = AnalysisConfig::default();
        let samples = sample_window(&mut source, 10, 18, &config).unwrap();
        assert_eq!(samples.len(), 8);
    }

    #[test]
    fn test_undecodable_frames_are_skipped() {
        let mut source = SyntheticFrameSource::lively(30.0, 10.0, 160, 90)
            .with_undecodable((0..90).collect());
        let config = AnalysisConfig::default();
        let samples = sample_window(&mut source, 0, 90, &config).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_empty_window_rejected() {
        let mut source = SyntheticFrameSource::lively(30.0, 10.0, 160, 90);
        let config = AnalysisConfig::default();
        assert!(sample_window(&mut source, 30, 30, &config).is_err());
    }

    #[test]
    fn test_samples_are_downscaled() {
        let mut source = SyntheticFrameSource::lively(30.0, 10.0, 640, 360);
        let config = AnalysisConfig::default();
        let samples = sample_window(&mut source, 0, 30, &config).unwrap();
        assert_eq!(samples[0].width(), config.analysis_grid_width);
        assert_eq!(samples[0].height(), 36);
    }
}
