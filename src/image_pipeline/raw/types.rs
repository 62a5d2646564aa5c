//! RAW image data types

use tracing::debug;

use crate::image_pipeline::color::ColorMatrix3x3;
use crate::image_pipeline::common::error::{ConversionError, Result};

/// Bit depth of packed sensor samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    /// Two samples per three bytes
    Twelve,
    /// Four samples per seven bytes
    Fourteen,
    /// One sample per 16-bit word
    Sixteen,
}

impl BitDepth {
    pub fn bits(self) -> u32 {
        match self {
            BitDepth::Twelve => 12,
            BitDepth::Fourteen => 14,
            BitDepth::Sixteen => 16,
        }
    }

    /// Largest value a sample of this depth can hold.
    pub fn max_value(self) -> u32 {
        (1 << self.bits()) - 1
    }

    /// Number of bytes holding `samples` tightly packed samples.
    pub fn packed_len(self, samples: usize) -> usize {
        (samples * self.bits() as usize).div_ceil(8)
    }
}

impl TryFrom<u32> for BitDepth {
    type Error = ConversionError;

    fn try_from(bits: u32) -> Result<Self> {
        match bits {
            12 => Ok(BitDepth::Twelve),
            14 => Ok(BitDepth::Fourteen),
            16 => Ok(BitDepth::Sixteen),
            other => Err(ConversionError::MalformedInput(format!(
                "unsupported bits_per_sample: {other}"
            ))),
        }
    }
}

/// Packed sensor samples exactly as stored in the container.
#[derive(Debug, Clone)]
pub struct RawSampleBuffer {
    /// Width of the sensor image in pixels
    pub width: usize,
    /// Height of the sensor image in pixels
    pub height: usize,
    /// 1 for a Bayer mosaic, 3 for linear RGB
    pub samples_per_pixel: usize,
    pub bit_depth: BitDepth,
    /// 16-bit words are stored with their bytes swapped
    pub swap_endian: bool,
    pub data: Vec<u8>,
}

impl RawSampleBuffer {
    pub fn sample_count(&self) -> usize {
        self.width * self.height * self.samples_per_pixel
    }
}

/// Sensor rectangle that excludes masked border photosites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveArea {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl ActiveArea {
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            top: 0,
            left: 0,
            bottom: height,
            right: width,
        }
    }

    /// Clamps the rectangle to a `width` x `height` image.
    pub fn clamped(&self, width: usize, height: usize) -> Self {
        let left = self.left.min(width);
        let top = self.top.min(height);
        Self {
            top,
            left,
            bottom: self.bottom.clamp(top, height),
            right: self.right.clamp(left, width),
        }
    }

    pub fn width(&self) -> usize {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> usize {
        self.bottom.saturating_sub(self.top)
    }
}

/// Per-file DNG metadata needed to develop the mosaic.
#[derive(Debug, Clone)]
pub struct CalibrationParameters {
    /// Black level per sample plane
    pub black_level: [u32; 4],
    /// White level per sample plane
    pub white_level: [u32; 4],
    pub active_area: ActiveArea,
    pub calibration_illuminant1: u16,
    pub calibration_illuminant2: u16,
    /// XYZ to camera, first illuminant
    pub color_matrix1: ColorMatrix3x3,
    /// XYZ to camera, second illuminant
    pub color_matrix2: ColorMatrix3x3,
    pub forward_matrix2: ColorMatrix3x3,
    pub camera_calibration2: ColorMatrix3x3,
    pub analog_balance: [f32; 3],
    /// White balance in camera space, as recorded at capture time
    pub as_shot_neutral: [f32; 3],
    /// Selects the forward-matrix colour path over plain colour-matrix inversion
    pub has_forward_matrix: bool,
    /// EXIF orientation code (1-8), 0 when unknown
    pub orientation: u16,
    pub samples_per_pixel: u32,
    pub bits_per_sample: u32,
}

impl CalibrationParameters {
    /// Neutral calibration for a `width` x `height` 16-bit mosaic.
    pub fn for_sensor(width: usize, height: usize) -> Self {
        Self {
            black_level: [0; 4],
            white_level: [u16::MAX as u32; 4],
            active_area: ActiveArea::full(width, height),
            calibration_illuminant1: 0,
            calibration_illuminant2: 0,
            color_matrix1: ColorMatrix3x3::IDENTITY,
            color_matrix2: ColorMatrix3x3::IDENTITY,
            forward_matrix2: ColorMatrix3x3::IDENTITY,
            camera_calibration2: ColorMatrix3x3::IDENTITY,
            analog_balance: [1.0; 3],
            as_shot_neutral: [1.0; 3],
            has_forward_matrix: false,
            orientation: 1,
            samples_per_pixel: 1,
            bits_per_sample: 16,
        }
    }

    pub fn log_summary(&self) {
        debug!("bits per sample = {}", self.bits_per_sample);
        debug!("samples per pixel = {}", self.samples_per_pixel);
        for s in 0..(self.samples_per_pixel as usize).min(4) {
            debug!("white_level[{}] = {}", s, self.white_level[s]);
            debug!("black_level[{}] = {}", s, self.black_level[s]);
        }
        debug!(
            "active_area = top {}, left {}, bottom {}, right {}",
            self.active_area.top, self.active_area.left, self.active_area.bottom, self.active_area.right
        );
        debug!("calibration_illuminant1 = {}", self.calibration_illuminant1);
        debug!("calibration_illuminant2 = {}", self.calibration_illuminant2);
        debug!("color_matrix1 = {:?}", self.color_matrix1);
        debug!("color_matrix2 = {:?}", self.color_matrix2);
        if self.has_forward_matrix {
            debug!("forward_matrix2 = {:?}", self.forward_matrix2);
        } else {
            debug!("forward_matrix2 not found!");
        }
        debug!("camera_calibration2 = {:?}", self.camera_calibration2);
        debug!("analog_balance = {:?}", self.analog_balance);
        debug!("as_shot_neutral = {:?}", self.as_shot_neutral);
        debug!("orientation = {}", self.orientation);
    }
}

/// A decoded RAW container: packed samples plus calibration.
#[derive(Debug, Clone)]
pub struct RawImageData {
    pub samples: RawSampleBuffer,
    pub calibration: CalibrationParameters,
}
