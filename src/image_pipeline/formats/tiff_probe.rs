use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::image_pipeline::color::srgb_to_linear_rgba;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::image::FloatImage;
use crate::image_pipeline::formats::probe::{FormatProbe, ProbeOutcome};
use crate::image_pipeline::formats::raw_probe::RAW_EXTENSIONS;

const LITTLE_ENDIAN_MAGIC: &[u8] = b"II*\0";
const BIG_ENDIAN_MAGIC: &[u8] = b"MM\0*";

/// Plain TIFF files: 8/16-bit sRGB or 32/64-bit float, gray, RGB or RGBA.
///
/// Files with a RAW extension are left alone, their first directory is
/// usually only a preview.
pub struct TiffProbe;

impl FormatProbe for TiffProbe {
    fn name(&self) -> &'static str {
        "tiff"
    }

    fn probe(&self, data: &[u8], extension: &str) -> ProbeOutcome {
        let is_tiff = data.starts_with(LITTLE_ENDIAN_MAGIC) || data.starts_with(BIG_ENDIAN_MAGIC);
        if !is_tiff || RAW_EXTENSIONS.contains(&extension) {
            return ProbeOutcome::NotThisFormat;
        }
        decode_tiff(data).map_or_else(ProbeOutcome::from, ProbeOutcome::Decoded)
    }
}

fn decode_tiff(data: &[u8]) -> Result<FloatImage> {
    let mut decoder =
        Decoder::new(Cursor::new(data)).map_err(|e| ConversionError::DecodeError(e.to_string()))?;
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| ConversionError::DecodeError(e.to_string()))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| ConversionError::DecodeError(e.to_string()))?;
    debug!("Decoding {}x{} TIFF, {:?}", width, height, color_type);

    let channels = match color_type {
        ColorType::Gray(_) => 1,
        ColorType::RGB(_) => 3,
        ColorType::RGBA(_) => 4,
        other => {
            return Err(ConversionError::UnsupportedVariant(format!(
                "TIFF colour type {:?}",
                other
            )));
        }
    };

    let (samples, encoded): (Vec<f32>, bool) = match decoder
        .read_image()
        .map_err(|e| ConversionError::DecodeError(e.to_string()))?
    {
        DecodingResult::U8(v) => (v.iter().map(|&s| s as f32 / u8::MAX as f32).collect(), true),
        DecodingResult::U16(v) => (v.iter().map(|&s| s as f32 / u16::MAX as f32).collect(), true),
        DecodingResult::F32(v) => (v, false),
        DecodingResult::F64(v) => (v.iter().map(|&s| s as f32).collect(), false),
        _ => {
            return Err(ConversionError::UnsupportedVariant(
                "TIFF sample format".to_string(),
            ));
        }
    };

    let (width, height) = (width as usize, height as usize);
    if samples.len() < width * height * channels {
        return Err(ConversionError::MalformedInput(format!(
            "TIFF of {}x{} holds {} samples",
            width,
            height,
            samples.len()
        )));
    }

    Ok(FloatImage::from_fn(width, height, |x, y| {
        let i = (y * width + x) * channels;
        let pixel = match channels {
            1 => [samples[i], samples[i], samples[i], 1.0],
            3 => [samples[i], samples[i + 1], samples[i + 2], 1.0],
            _ => [samples[i], samples[i + 1], samples[i + 2], samples[i + 3]],
        };
        if encoded { srgb_to_linear_rgba(pixel) } else { pixel }
    }))
}
