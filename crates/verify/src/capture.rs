//! Pixel comparison of the two captures

use std::path::Path;

use image::{GenericImageView, Pixel};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::Result;

/// Per-channel difference below which two pixels count as equal. Absorbs
/// anti-aliasing and encoder noise.
const TOLERANCE: i32 = 5;

/// Outcome of comparing the two captures
#[derive(Debug, Clone)]
pub struct CaptureDiff {
    /// No pixel differs beyond the tolerance
    pub identical: bool,

    /// Number of differing pixels
    pub diff_pixels: u64,

    /// Total pixels compared
    pub total_pixels: u64,

    /// Percentage of pixels that differ
    pub diff_percent: f64,
}

/// Compare two capture files pixel by pixel.
pub fn compare_captures(first: &Path, second: &Path) -> Result<CaptureDiff> {
    // Byte-identical files need no decode
    if hash_file(first)? == hash_file(second)? {
        debug!("Captures are byte-identical");
        let (width, height) = image::image_dimensions(first)?;
        return Ok(CaptureDiff {
            identical: true,
            diff_pixels: 0,
            total_pixels: u64::from(width) * u64::from(height),
            diff_percent: 0.0,
        });
    }

    let first_img = image::open(first)?;
    let second_img = image::open(second)?;

    if first_img.dimensions() != second_img.dimensions() {
        warn!(
            "Capture dimensions differ: {:?} vs {:?}; comparing the overlap",
            first_img.dimensions(),
            second_img.dimensions()
        );
    }

    let first_rgba = first_img.to_rgba8();
    let second_rgba = second_img.to_rgba8();

    let width = first_rgba.width().min(second_rgba.width());
    let height = first_rgba.height().min(second_rgba.height());

    let mut diff_pixels = 0u64;
    for y in 0..height {
        for x in 0..width {
            if pixels_differ(first_rgba.get_pixel(x, y), second_rgba.get_pixel(x, y)) {
                diff_pixels += 1;
            }
        }
    }

    let total_pixels = u64::from(width) * u64::from(height);
    let diff_percent = (diff_pixels as f64 / total_pixels as f64) * 100.0;

    Ok(CaptureDiff {
        identical: diff_pixels == 0,
        diff_pixels,
        total_pixels,
        diff_percent,
    })
}

/// Check if two pixels differ beyond the tolerance.
fn pixels_differ(a: &image::Rgba<u8>, b: &image::Rgba<u8>) -> bool {
    let a_channels = a.channels();
    let b_channels = b.channels();

    for i in 0..4 {
        let diff = (i32::from(a_channels[i]) - i32::from(b_channels[i])).abs();
        if diff > TOLERANCE {
            return true;
        }
    }

    false
}

/// Hash a file using SHA256.
fn hash_file(path: &Path) -> Result<String> {
    let data = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}
