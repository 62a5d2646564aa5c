use std::io::{Cursor, Write};

use image::{DynamicImage, ImageFormat, Rgb32FImage, RgbImage, Rgba32FImage};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::image::FloatImage;
use crate::image_pipeline::common::timing::Timer;
use crate::image_pipeline::export::tonemap::{quantize_rgb8, tonemap};
use crate::image_pipeline::export::types::{ExportConfig, OutputFormat, TiffCompression};
use crate::image_pipeline::export::writer::ImageWriter;
use crate::image_pipeline::formats::pfm::encode_pfm;

pub struct StandardImageWriter;

impl ImageWriter for StandardImageWriter {
    fn write_image(
        &self,
        image: &FloatImage,
        format: OutputFormat,
        output: &mut dyn Write,
        config: &ExportConfig,
    ) -> Result<()> {
        debug!(
            "Encoding {:?} image: {}x{}",
            format,
            image.width(),
            image.height()
        );

        let timer = Timer::start("tonemap");
        let mapped = tonemap(image, format, config);
        let (name, duration) = timer.stop();
        debug!("{} took: {:.3} seconds.", name, duration.as_secs_f64());

        match format {
            OutputFormat::Pfm => encode_pfm(&mapped, output)?,
            OutputFormat::Tiff => write_float_tiff(&mapped, output, config.compression)?,
            OutputFormat::Exr => {
                let buffer = Rgba32FImage::from_raw(
                    mapped.width() as u32,
                    mapped.height() as u32,
                    mapped.to_rgba_samples(),
                )
                .ok_or_else(|| ConversionError::EncodeError("RGBA buffer size mismatch".to_string()))?;
                encode_with_codec(DynamicImage::ImageRgba32F(buffer), ImageFormat::OpenExr, output)?;
            }
            OutputFormat::Hdr => {
                let buffer = Rgb32FImage::from_raw(
                    mapped.width() as u32,
                    mapped.height() as u32,
                    mapped.to_rgb_samples(),
                )
                .ok_or_else(|| ConversionError::EncodeError("RGB buffer size mismatch".to_string()))?;
                encode_with_codec(DynamicImage::ImageRgb32F(buffer), ImageFormat::Hdr, output)?;
            }
            ldr => {
                let timer = Timer::start("quantize");
                let data = quantize_rgb8(&mapped, config.dither);
                let (name, duration) = timer.stop();
                debug!("{} took: {:.3} seconds.", name, duration.as_secs_f64());

                let buffer = RgbImage::from_raw(mapped.width() as u32, mapped.height() as u32, data)
                    .ok_or_else(|| ConversionError::EncodeError("RGB buffer size mismatch".to_string()))?;
                let codec = ldr_codec(ldr).ok_or_else(|| {
                    ConversionError::UnsupportedFormat(format!("{:?} is not an 8-bit format", ldr))
                })?;
                encode_with_codec(DynamicImage::ImageRgb8(buffer), codec, output)?;
            }
        }

        debug!("{:?} encoding complete", format);
        Ok(())
    }
}

fn ldr_codec(format: OutputFormat) -> Option<ImageFormat> {
    match format {
        OutputFormat::Png => Some(ImageFormat::Png),
        OutputFormat::Jpeg => Some(ImageFormat::Jpeg),
        OutputFormat::Bmp => Some(ImageFormat::Bmp),
        OutputFormat::Tga => Some(ImageFormat::Tga),
        OutputFormat::Ppm => Some(ImageFormat::Pnm),
        _ => None,
    }
}

fn encode_with_codec(image: DynamicImage, format: ImageFormat, output: &mut dyn Write) -> Result<()> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), format)
        .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
    output.write_all(&buffer)?;
    Ok(())
}

fn write_float_tiff(image: &FloatImage, output: &mut dyn Write, compression: TiffCompression) -> Result<()> {
    let mut buffer = Vec::new();

    let compression = match compression {
        TiffCompression::None => tiff::encoder::Compression::Uncompressed,
        TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
        TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
        TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Best),
    };

    tiff::encoder::TiffEncoder::new(Cursor::new(&mut buffer))
        .map_err(|e| ConversionError::EncodeError(e.to_string()))?
        .with_compression(compression)
        .write_image::<tiff::encoder::colortype::RGBA32Float>(
            image.width() as u32,
            image.height() as u32,
            &image.to_rgba_samples(),
        )
        .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

    output.write_all(&buffer)?;
    Ok(())
}
