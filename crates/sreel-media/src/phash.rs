//! DCT-based perceptual fingerprints for duplicate-footage detection.
//!
//! A sample is resized to a 32x32 grid, transformed with a 2-D DCT-II, and
//! the 8x8 low-frequency block is thresholded against its median into a
//! 64-bit vector. Near-duplicate footage is detected by counting fingerprint
//! pairs within a Hamming-distance threshold.

use std::cmp::Ordering;

use image::{imageops, GrayImage};
use ndarray::Array2;

/// Bits in one fingerprint.
pub const HASH_BITS: u32 = 64;

/// Input grid edge for the frequency transform.
const HASH_GRID: usize = 32;

/// Edge of the retained low-frequency block.
const LOW_FREQ: usize = 8;

/// Compute the perceptual fingerprint of a grayscale sample.
pub fn fingerprint(sample: &GrayImage) -> u64 {
    let small = imageops::resize(
        sample,
        HASH_GRID as u32,
        HASH_GRID as u32,
        imageops::FilterType::Triangle,
    );

    let mut grid = Array2::<f32>::zeros((HASH_GRID, HASH_GRID));
    for (x, y, pixel) in small.enumerate_pixels() {
        grid[[y as usize, x as usize]] = pixel.0[0] as f32;
    }

    let freq = dct_2d(&grid);

    let mut coeffs = [0f32; LOW_FREQ * LOW_FREQ];
    for u in 0..LOW_FREQ {
        for v in 0..LOW_FREQ {
            coeffs[u * LOW_FREQ + v] = freq[[u, v]];
        }
    }

    // The DC term dwarfs everything else; exclude it from the median so the
    // threshold tracks actual structure.
    let mut ac: Vec<f32> = coeffs[1..].to_vec();
    ac.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let median = ac[ac.len() / 2];

    let mut bits = 0u64;
    for (i, &coeff) in coeffs.iter().enumerate() {
        if coeff > median {
            bits |= 1 << i;
        }
    }
    bits
}

/// 2-D DCT-II over a square grid, rows then columns.
fn dct_2d(grid: &Array2<f32>) -> Array2<f32> {
    let n = grid.nrows();
    let mut table = Array2::<f32>::zeros((n, n));
    for u in 0..n {
        for x in 0..n {
            table[[u, x]] =
                ((std::f32::consts::PI / n as f32) * (x as f32 + 0.5) * u as f32).cos();
        }
    }

    let mut rows = Array2::<f32>::zeros((n, n));
    for y in 0..n {
        for u in 0..n {
            let mut acc = 0.0;
            for x in 0..n {
                acc += grid[[y, x]] * table[[u, x]];
            }
            rows[[y, u]] = acc;
        }
    }

    let mut out = Array2::<f32>::zeros((n, n));
    for u in 0..n {
        for v in 0..n {
            let mut acc = 0.0;
            for y in 0..n {
                acc += rows[[y, v]] * table[[u, y]];
            }
            out[[u, v]] = acc;
        }
    }
    out
}

/// Number of differing bits between two fingerprints.
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// Fraction of fingerprint pairs within `max_distance` bits of each other.
///
/// Returns 0.0 when either side carries no fingerprints; segments without
/// fingerprints are never considered duplicates.
pub fn duplicate_fraction(a: &[u64], b: &[u64], max_distance: u32) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let mut close = 0usize;
    for &x in a {
        for &y in b {
            if hamming_distance(x, y) <= max_distance {
                close += 1;
            }
        }
    }
    close as f64 / (a.len() * b.len()) as f64
}

/// Whether two fingerprint sets describe visually similar footage.
pub fn are_similar(a: &[u64], b: &[u64], max_distance: u32, min_fraction: f64) -> bool {
    duplicate_fraction(a, b, max_distance) > min_fraction
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(seed: u32) -> GrayImage {
        GrayImage::from_fn(64, 64, |x, y| {
            let v = (x.wrapping_mul(3 + seed) ^ y.wrapping_mul(7 + seed * 5)) % 256;
            image::Luma([v as u8])
        })
    }

    #[test]
    fn test_identical_images_hash_identically() {
        let a = fingerprint(&textured(1));
        let b = fingerprint(&textured(1));
        assert_eq!(hamming_distance(a, b), 0);
    }

    #[test]
    fn test_hash_splits_bits_around_median() {
        let ones = fingerprint(&textured(1)).count_ones();
        // Median thresholding sets roughly half the bits on textured input.
        assert!((16..=48).contains(&ones), "got {ones} set bits");
    }

    #[test]
    fn test_different_textures_hash_apart() {
        let a = fingerprint(&textured(1));
        let b = fingerprint(&textured(9));
        assert!(hamming_distance(a, b) > 12, "distance {}", hamming_distance(a, b));
    }

    #[test]
    fn test_hamming_distance() {
        assert_eq!(hamming_distance(0, 0), 0);
        assert_eq!(hamming_distance(0, u64::MAX), 64);
        assert_eq!(hamming_distance(0b1010, 0b0110), 2);
    }

    #[test]
    fn test_duplicate_fraction() {
        assert_eq!(duplicate_fraction(&[], &[1], 12), 0.0);
        assert_eq!(duplicate_fraction(&[1], &[1], 0), 1.0);
        let frac = duplicate_fraction(&[0, u64::MAX], &[0], 12);
        assert!((frac - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_are_similar_thresholds() {
        assert!(are_similar(&[7], &[7], 12, 0.5));
        assert!(!are_similar(&[0], &[u64::MAX], 12, 0.5));
        assert!(!are_similar(&[], &[], 12, 0.5));
    }
}
