//! Grayscale PNG snapshots of height fields and caustic textures.

use std::path::Path;

use image::{GrayImage, ImageResult, Luma};

use crate::grid::Grid;

/// Heights mapped linearly from `[min, max]` to `[0, 255]`
///
/// A flat (or empty) grid renders as mid gray. Non-finite samples are black.
pub fn heights_image(heights: &Grid<f32>) -> GrayImage {
    let size = heights.size() as u32;
    let (lo, hi) = heights
        .as_slice()
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;

    GrayImage::from_fn(size, size, |x, y| {
        let h = heights.get(x as usize, y as usize);
        let gray = if !h.is_finite() {
            0
        } else if range > 0.0 {
            (((h - lo) / range) * 255.0).round().clamp(0.0, 255.0) as u8
        } else {
            128
        };
        Luma([gray])
    })
}

/// Intensities in `[0, 1]` mapped to `[0, 255]`
pub fn intensity_image(intensity: &Grid<f32>) -> GrayImage {
    let size = intensity.size() as u32;
    GrayImage::from_fn(size, size, |x, y| {
        let v = intensity.get(x as usize, y as usize);
        let v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Luma([(v * 255.0).round() as u8])
    })
}

pub fn save_heights(heights: &Grid<f32>, path: impl AsRef<Path>) -> ImageResult<()> {
    heights_image(heights).save(path)
}

pub fn save_intensity(intensity: &Grid<f32>, path: impl AsRef<Path>) -> ImageResult<()> {
    intensity_image(intensity).save(path)
}
