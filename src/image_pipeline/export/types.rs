//! Export configuration types

use std::path::Path;
use std::str::FromStr;

use crate::image_pipeline::common::error::ConversionError;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

impl FromStr for TiffCompression {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(TiffCompression::None),
            "lzw" => Ok(TiffCompression::Lzw),
            "deflate-fast" => Ok(TiffCompression::DeflateFast),
            "deflate" | "deflate-balanced" => Ok(TiffCompression::DeflateBalanced),
            "deflate-best" => Ok(TiffCompression::DeflateBest),
            other => Err(ConversionError::UnsupportedFormat(format!(
                "unknown TIFF compression {other:?}"
            ))),
        }
    }
}

/// Container written for an output extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pfm,
    /// RGBA 32-bit float
    Tiff,
    Exr,
    /// Radiance RGBE
    Hdr,
    Png,
    Jpeg,
    Bmp,
    Tga,
    Ppm,
}

impl OutputFormat {
    pub fn from_extension(extension: &str) -> Result<Self, ConversionError> {
        match extension.to_ascii_lowercase().as_str() {
            "pfm" => Ok(OutputFormat::Pfm),
            "tif" | "tiff" => Ok(OutputFormat::Tiff),
            "exr" => Ok(OutputFormat::Exr),
            "hdr" => Ok(OutputFormat::Hdr),
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "bmp" => Ok(OutputFormat::Bmp),
            "tga" => Ok(OutputFormat::Tga),
            "ppm" => Ok(OutputFormat::Ppm),
            other => Err(ConversionError::UnsupportedFormat(format!(
                "no writer for extension {other:?}"
            ))),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConversionError> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        Self::from_extension(extension)
    }

    /// Floating-point containers keep linear values; the rest are tonemapped to 8 bits.
    pub fn is_hdr(self) -> bool {
        matches!(
            self,
            OutputFormat::Pfm | OutputFormat::Tiff | OutputFormat::Exr | OutputFormat::Hdr
        )
    }
}

/// Configuration for writing developed images
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Exposure multiplier applied to every target
    pub gain: f32,
    /// Display gamma for 8-bit targets when sRGB is off
    pub gamma: f32,
    /// Encode 8-bit targets with the sRGB curve
    pub srgb: bool,
    /// Ordered dithering before 8-bit quantisation
    pub dither: bool,
    /// Compression method for TIFF output
    pub compression: TiffCompression,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            gain: 1.0,
            gamma: 2.2,
            srgb: true,
            dither: true,
            compression: TiffCompression::None,
        }
    }
}

impl ExportConfig {
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder::default()
    }
}

/// Builder for ExportConfig
#[derive(Default)]
pub struct ExportConfigBuilder {
    gain: Option<f32>,
    gamma: Option<f32>,
    srgb: Option<bool>,
    dither: Option<bool>,
    compression: Option<TiffCompression>,
}

impl ExportConfigBuilder {
    pub fn gain(mut self, gain: f32) -> Self {
        self.gain = Some(gain);
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn srgb(mut self, enable: bool) -> Self {
        self.srgb = Some(enable);
        self
    }

    pub fn dither(mut self, enable: bool) -> Self {
        self.dither = Some(enable);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn build(self) -> ExportConfig {
        let default = ExportConfig::default();
        ExportConfig {
            gain: self.gain.unwrap_or(default.gain),
            gamma: self.gamma.unwrap_or(default.gamma),
            srgb: self.srgb.unwrap_or(default.srgb),
            dither: self.dither.unwrap_or(default.dither),
            compression: self.compression.unwrap_or(default.compression),
        }
    }
}
