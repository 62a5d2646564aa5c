use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::image::FloatImage;
use crate::image_pipeline::geometry::orientation::Orientation;
use crate::image_pipeline::raw::types::ActiveArea;

/// Cuts `image` down to `area`, clamped to the image bounds.
///
/// Columns `left..right` and rows `top..bottom` are kept. A rectangle that
/// covers the whole image returns it untouched.
pub fn crop(image: FloatImage, area: &ActiveArea) -> Result<FloatImage> {
    let (width, height) = (image.width(), image.height());
    let area = area.clamped(width, height);

    if area.width() == 0 || area.height() == 0 {
        return Err(ConversionError::MalformedInput(format!(
            "active area (top {}, left {}, bottom {}, right {}) is empty within a {}x{} image",
            area.top, area.left, area.bottom, area.right, width, height
        )));
    }
    if area == ActiveArea::full(width, height) {
        return Ok(image);
    }

    debug!(
        "Cropping {}x{} image to {}x{} at ({}, {})",
        width,
        height,
        area.width(),
        area.height(),
        area.left,
        area.top
    );
    Ok(FloatImage::from_fn(area.width(), area.height(), |x, y| {
        image.get(area.left + x, area.top + y)
    }))
}

/// Crops to the active area, then applies the EXIF orientation `code`.
pub fn crop_and_orient(image: FloatImage, area: &ActiveArea, code: u16) -> Result<FloatImage> {
    let cropped = crop(image, area)?;
    Ok(Orientation::from_code(code).apply(cropped))
}
