//! Motion, variance, and brightness scoring over sampled frames.

use image::GrayImage;

use crate::phash;

/// Scores computed for one analysis window.
///
/// All values are normalized to [0, 1]. A window where nothing decoded
/// scores all zeros and no fingerprint; the candidate generator filters it
/// out as a dead zone.
#[derive(Debug, Clone, Default)]
pub struct WindowScores {
    /// Mean absolute pixel difference between consecutive samples.
    pub motion: f64,
    /// Mean pairwise difference among the first, middle, and last sample.
    pub variance: f64,
    /// Mean pixel intensity across samples.
    pub avg_brightness: f64,
    /// Lowest per-sample mean intensity in the window.
    pub min_brightness: f64,
    /// Perceptual fingerprint of the mid-window sample.
    pub fingerprint: Option<u64>,
}

/// Score a window from its preprocessed samples.
pub fn score_samples(samples: &[GrayImage]) -> WindowScores {
    if samples.is_empty() {
        return WindowScores::default();
    }

    let motion = if samples.len() < 2 {
        0.0
    } else {
        let total: f64 = samples
            .windows(2)
            .map(|pair| mean_abs_diff(&pair[0], &pair[1]))
            .sum();
        total / (samples.len() - 1) as f64
    };

    let variance = spread_score(samples);

    let means: Vec<f64> = samples.iter().map(frame_mean).collect();
    let avg_brightness = means.iter().sum::<f64>() / means.len() as f64;
    let min_brightness = means.iter().copied().fold(f64::INFINITY, f64::min);

    let fingerprint = Some(phash::fingerprint(&samples[samples.len() / 2]));

    WindowScores {
        motion,
        variance,
        avg_brightness,
        min_brightness,
        fingerprint,
    }
}

/// Mean pairwise difference among the first, middle, and last sample.
///
/// Catches windows that wiggle locally but never change content: their
/// consecutive diffs are non-zero while first-vs-last stays flat.
fn spread_score(samples: &[GrayImage]) -> f64 {
    let mut anchors = vec![0, samples.len() / 2, samples.len() - 1];
    anchors.dedup();
    if anchors.len() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..anchors.len() {
        for j in (i + 1)..anchors.len() {
            total += mean_abs_diff(&samples[anchors[i]], &samples[anchors[j]]);
            pairs += 1;
        }
    }
    total / pairs as f64
}

/// Mean absolute per-pixel difference between two samples, normalized.
fn mean_abs_diff(a: &GrayImage, b: &GrayImage) -> f64 {
    let a = a.as_raw();
    let b = b.as_raw();
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    let total: u64 = a[..len]
        .iter()
        .zip(&b[..len])
        .map(|(&x, &y)| u64::from(x.abs_diff(y)))
        .sum();
    total as f64 / len as f64 / 255.0
}

/// Mean pixel intensity of a sample, normalized.
fn frame_mean(image: &GrayImage) -> f64 {
    let raw = image.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let total: u64 = raw.iter().map(|&p| u64::from(p)).sum();
    total as f64 / raw.len() as f64 / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(level: u8) -> GrayImage {
        GrayImage::from_pixel(32, 32, image::Luma([level]))
    }

    #[test]
    fn test_empty_window_scores_zero() {
        let scores = score_samples(&[]);
        assert_eq!(scores.motion, 0.0);
        assert_eq!(scores.variance, 0.0);
        assert_eq!(scores.avg_brightness, 0.0);
        assert!(scores.fingerprint.is_none());
    }

    #[test]
    fn test_static_frames_score_zero_motion() {
        let samples = vec![flat(120); 5];
        let scores = score_samples(&samples);
        assert_eq!(scores.motion, 0.0);
        assert_eq!(scores.variance, 0.0);
        assert!((scores.avg_brightness - 120.0 / 255.0).abs() < 1e-6);
        assert!(scores.fingerprint.is_some());
    }

    #[test]
    fn test_alternating_frames_score_motion() {
        let samples = vec![flat(0), flat(255), flat(0), flat(255)];
        let scores = score_samples(&samples);
        assert!((scores.motion - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_brightness_tracks_darkest_sample() {
        let samples = vec![flat(200), flat(10), flat(200)];
        let scores = score_samples(&samples);
        assert!((scores.min_brightness - 10.0 / 255.0).abs() < 1e-6);
        assert!(scores.avg_brightness > scores.min_brightness);
    }

    #[test]
    fn test_drift_scores_variance() {
        // Slow drift: small consecutive diffs, large first-to-last spread.
        let samples: Vec<GrayImage> = (0..5).map(|i| flat(40 * i as u8)).collect();
        let scores = score_samples(&samples);
        assert!(scores.variance > scores.motion);
    }
}
