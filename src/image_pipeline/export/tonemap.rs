//! Exposure, display encoding and 8-bit quantisation.

use rayon::prelude::*;

use crate::image_pipeline::color::linear_to_srgb;
use crate::image_pipeline::common::image::FloatImage;
use crate::image_pipeline::export::types::{ExportConfig, OutputFormat};

/// Side of the ordered dither matrix is `1 << DITHER_BITS`.
const DITHER_BITS: usize = 3;
const DITHER_SIZE: usize = 1 << DITHER_BITS;

/// Applies gain, then the sRGB curve or display gamma when `format` is 8-bit.
/// Alpha is left alone.
pub fn tonemap(image: &FloatImage, format: OutputFormat, config: &ExportConfig) -> FloatImage {
    let encode = !format.is_hdr();
    let inverse_gamma = 1.0 / config.gamma;
    let transfer = |v: f32| {
        let v = v * config.gain;
        if !encode {
            v
        } else if config.srgb {
            linear_to_srgb(v)
        } else if config.gamma != 1.0 {
            v.max(0.0).powf(inverse_gamma)
        } else {
            v
        }
    };

    FloatImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get(x, y);
        [transfer(p[0]), transfer(p[1]), transfer(p[2]), p[3]]
    })
}

/// Ordered-dither offset for a pixel, in (-0.5, 0.5) of one 8-bit step.
pub fn dither_offset(x: usize, y: usize) -> f32 {
    // recursive Bayer matrix: each level refines the 2x2 pattern [[0, 2], [3, 1]]
    let index = (0..DITHER_BITS).fold(0, |acc, bit| {
        let xb = (x >> bit) & 1;
        let yb = (y >> bit) & 1;
        acc * 4 + 2 * (xb ^ yb) + yb
    });
    (index as f32 + 0.5) / (DITHER_SIZE * DITHER_SIZE) as f32 - 0.5
}

/// Interleaved 8-bit RGB, alpha dropped, values outside [0, 1] clipped.
pub fn quantize_rgb8(image: &FloatImage, dither: bool) -> Vec<u8> {
    let width = image.width();
    let mut data = vec![0u8; width * image.height() * 3];
    if data.is_empty() {
        return data;
    }

    data.par_chunks_mut(width * 3)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.chunks_exact_mut(3).enumerate() {
                let pixel = image.get(x, y);
                let offset = if dither { dither_offset(x, y) } else { 0.0 };
                for c in 0..3 {
                    out[c] = (pixel[c] * 255.0 + offset).round().clamp(0.0, 255.0) as u8;
                }
            }
        });
    data
}
