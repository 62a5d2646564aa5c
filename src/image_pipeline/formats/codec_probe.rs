use image::{ColorType, ImageFormat};
use tracing::debug;

use crate::image_pipeline::color::srgb_to_linear_rgba;
use crate::image_pipeline::common::image::FloatImage;
use crate::image_pipeline::formats::probe::{FormatProbe, ProbeOutcome};

/// Everything the `image` crate recognises from its magic bytes, except TIFF.
///
/// 8 and 16-bit data is taken as sRGB encoded and linearised; float formats
/// (Radiance HDR, OpenEXR) are already linear.
pub struct CodecProbe;

impl FormatProbe for CodecProbe {
    fn name(&self) -> &'static str {
        "codec"
    }

    fn probe(&self, data: &[u8], _extension: &str) -> ProbeOutcome {
        let format = match image::guess_format(data) {
            // TIFF containers are usually camera RAW files
            Ok(ImageFormat::Tiff) | Err(_) => return ProbeOutcome::NotThisFormat,
            Ok(format) => format,
        };
        debug!("Decoding {:?} image", format);

        let decoded = match image::load_from_memory_with_format(data, format) {
            Ok(decoded) => decoded,
            Err(e) => return ProbeOutcome::Malformed(e.to_string()),
        };

        let linear = matches!(decoded.color(), ColorType::Rgb32F | ColorType::Rgba32F);
        let (width, height) = (decoded.width() as usize, decoded.height() as usize);
        let pixels = decoded
            .to_rgba32f()
            .into_raw()
            .chunks_exact(4)
            .map(|p| {
                let pixel = [p[0], p[1], p[2], p[3]];
                if linear { pixel } else { srgb_to_linear_rgba(pixel) }
            })
            .collect();

        FloatImage::from_pixels(width, height, pixels)
            .map_or_else(ProbeOutcome::from, ProbeOutcome::Decoded)
    }
}
