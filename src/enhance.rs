//! Saturation, contrast and brightness adjustment of the base map.
//!
//! Each step blends the image with a degenerate version of itself:
//! `out = degenerate + factor * (pixel - degenerate)`.

use image::RgbaImage;

use crate::style::ColorAdjust;

/// Applies saturation, contrast and brightness in that order. Alpha is kept.
pub fn adjust_colors(image: &mut RgbaImage, adjust: &ColorAdjust) {
    saturate(image, adjust.saturation);
    contrast(image, adjust.contrast);
    brighten(image, adjust.brightness);
}

/// Blends towards (factor < 1) or away from (factor > 1) the greyscale image.
pub fn saturate(image: &mut RgbaImage, factor: f32) {
    for pixel in image.pixels_mut() {
        let grey = luma(pixel.0);
        for c in pixel.0.iter_mut().take(3) {
            *c = blend(grey, *c, factor);
        }
    }
}

/// Blends towards or away from the mean grey value of the whole image.
pub fn contrast(image: &mut RgbaImage, factor: f32) {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return;
    }

    let sum: u64 = image.pixels().map(|p| u64::from(luma(p.0))).sum();
    let mean = ((sum as f64 / count as f64) + 0.5) as u8;

    for pixel in image.pixels_mut() {
        for c in pixel.0.iter_mut().take(3) {
            *c = blend(mean, *c, factor);
        }
    }
}

/// Blends towards or away from black.
pub fn brighten(image: &mut RgbaImage, factor: f32) {
    for pixel in image.pixels_mut() {
        for c in pixel.0.iter_mut().take(3) {
            *c = blend(0, *c, factor);
        }
    }
}

fn luma(rgba: [u8; 4]) -> u8 {
    let [r, g, b, _] = rgba;
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000) as u8
}

fn blend(degenerate: u8, value: u8, factor: f32) -> u8 {
    let d = f32::from(degenerate);
    (d + factor * (f32::from(value) - d)).round().max(0.0).min(255.0) as u8
}
