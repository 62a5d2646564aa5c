//! Types for debayering operations

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::types::ActiveArea;

/// Colour filter over one photosite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfaColor {
    Red,
    Green,
    Blue,
}

/// Parity of the red photosite within each 2x2 RGGB-family tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedOffset {
    /// 0 or 1
    pub x: usize,
    /// 0 or 1
    pub y: usize,
}

impl RedOffset {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x: x & 1, y: y & 1 }
    }

    /// Red sits at the active-area origin.
    pub fn from_active_area(area: &ActiveArea) -> Self {
        Self::new(area.left, area.top)
    }

    #[inline]
    pub fn is_red_row(&self, y: usize) -> bool {
        (y & 1) == self.y
    }

    #[inline]
    pub fn color_at(&self, x: usize, y: usize) -> CfaColor {
        match ((x & 1) == self.x, self.is_red_row(y)) {
            (true, true) => CfaColor::Red,
            (false, false) => CfaColor::Blue,
            _ => CfaColor::Green,
        }
    }
}

/// Single-channel Bayer mosaic, one sample per photosite, row-major.
#[derive(Debug, Clone)]
pub struct Mosaic {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl Mosaic {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != width * height {
            return Err(ConversionError::MalformedInput(format!(
                "mosaic of {}x{} needs {} samples, got {}",
                width,
                height,
                width * height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Samples a constant RGB colour through the CFA.
    pub fn from_color(width: usize, height: usize, red: RedOffset, rgb: [f32; 3]) -> Self {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| match red.color_at(x, y) {
                CfaColor::Red => rgb[0],
                CfaColor::Green => rgb[1],
                CfaColor::Blue => rgb[2],
            })
            .collect();
        Self {
            width,
            height,
            data,
        }
    }
}
