//! Floating-point RGBA image produced by every decode path.

use rayon::prelude::*;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// One linear RGBA pixel.
pub type Rgba = [f32; 4];

/// Row-major grid of RGBA pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl FloatImage {
    /// Allocates a `width` x `height` image of transparent black.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width * height],
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Rgba>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(ConversionError::MalformedInput(format!(
                "expected {} pixels for a {}x{} image, got {}",
                width * height,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel, one row per task.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> Rgba + Sync,
    {
        let mut image = Self::new(width, height);
        image.par_rows_mut().for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = f(x, y);
            }
        });
        image
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: Rgba) {
        self.pixels[y * self.width + x] = value;
    }

    /// Parallel iterator over `(y, row)` pairs; each row is owned by one task.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = (usize, &mut [Rgba])> {
        // par_chunks_mut rejects a zero chunk size
        let width = self.width.max(1);
        self.pixels.par_chunks_mut(width).enumerate()
    }

    /// Interleaved `[r, g, b, a, r, g, b, a, ...]` samples.
    pub fn to_rgba_samples(&self) -> Vec<f32> {
        self.pixels.iter().flatten().copied().collect()
    }

    /// Interleaved `[r, g, b, ...]` samples, alpha dropped.
    pub fn to_rgb_samples(&self) -> Vec<f32> {
        self.pixels.iter().flat_map(|p| [p[0], p[1], p[2]]).collect()
    }
}
