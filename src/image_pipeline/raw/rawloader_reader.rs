//! RAW image reader implementation using the rawloader library.
//!
//! rawloader decodes the camera-specific compression itself, so the samples
//! handed to the develop pipeline are always 16-bit little-endian words. The
//! calibration is rebuilt from rawloader's per-camera metadata.

use std::io::Cursor;

use rawloader::{Orientation, RawImageData as RawloaderImageData};
use tracing::{debug, warn};

use crate::image_pipeline::color::ColorMatrix3x3;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::reader::RawImageReader;
use crate::image_pipeline::raw::types::{
    ActiveArea, BitDepth, CalibrationParameters, RawImageData, RawSampleBuffer,
};

/// Adobe coefficients above this magnitude are in dcraw's x10000 integer convention.
const INTEGER_COEFFICIENT_THRESHOLD: f32 = 16.0;
const INTEGER_COEFFICIENT_SCALE: f32 = 10_000.0;

/// RAW image reader that uses the rawloader library for decoding.
///
/// Supports any format rawloader can decode (DNG, ARW, CR2, NEF, RAF, ...).
///
/// The red photosite is taken from the parity of the active-area origin, not
/// from the CFA pattern rawloader reports. Sensors whose pattern puts green or
/// blue at that origin (GRBG, GBRG, BGGR) develop with red and blue swapped;
/// only a warning is logged for them.
pub struct RawLoaderReader;

impl RawImageReader for RawLoaderReader {
    /// Decodes a RAW file into packed samples and calibration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rawdev_rs::image_pipeline::raw::{RawImageReader, RawLoaderReader};
    ///
    /// let raw_bytes = std::fs::read("image.dng").unwrap();
    /// let raw = RawLoaderReader.read_raw(&raw_bytes).unwrap();
    /// println!("{}x{}", raw.samples.width, raw.samples.height);
    /// ```
    fn read_raw(&self, data: &[u8]) -> Result<RawImageData> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        let width = decoded.width;
        let height = decoded.height;
        debug!(
            "Decoded {} {} image: {}x{}, {} sample(s) per pixel",
            decoded.clean_make, decoded.clean_model, width, height, decoded.cpp
        );

        // Float data (normalized 0.0-1.0) is scaled to the u16 range
        let bytes: Vec<u8> = match &decoded.data {
            RawloaderImageData::Integer(values) => {
                values.iter().flat_map(|&v| v.to_le_bytes()).collect()
            }
            RawloaderImageData::Float(values) => values
                .iter()
                .flat_map(|&v| ((v.clamp(0.0, 1.0) * u16::MAX as f32) as u16).to_le_bytes())
                .collect(),
        };

        // crops are margins: top, right, bottom, left
        let [top, right, bottom, left] = decoded.crops;
        let active_area = ActiveArea {
            top,
            left,
            bottom: height.saturating_sub(bottom),
            right: width.saturating_sub(right),
        };

        // RedOffset assumes red at the active-area origin
        if decoded.cpp == 1 && decoded.cfa.color_at(top, left) != 0 {
            warn!(
                "CFA pattern {} does not start with red at the active area origin; colours may be swapped",
                decoded.cfa.name
            );
        }

        let color_matrix = color_matrix_from_xyz_to_cam(&decoded.xyz_to_cam);

        let mut calibration = CalibrationParameters::for_sensor(width, height);
        calibration.black_level = decoded.blacklevels.map(u32::from);
        calibration.white_level = decoded.whitelevels.map(u32::from);
        calibration.active_area = active_area;
        calibration.color_matrix1 = color_matrix;
        calibration.color_matrix2 = color_matrix;
        calibration.as_shot_neutral = neutral_from_wb_coeffs(&decoded.wb_coeffs);
        calibration.orientation = orientation_code(&decoded.orientation);
        calibration.samples_per_pixel = decoded.cpp as u32;
        calibration.bits_per_sample = BitDepth::Sixteen.bits();
        calibration.log_summary();

        Ok(RawImageData {
            samples: RawSampleBuffer {
                width,
                height,
                samples_per_pixel: decoded.cpp,
                bit_depth: BitDepth::Sixteen,
                swap_endian: false,
                data: bytes,
            },
            calibration,
        })
    }
}

pub(super) fn color_matrix_from_xyz_to_cam(xyz_to_cam: &[[f32; 3]; 4]) -> ColorMatrix3x3 {
    let mut rows = [xyz_to_cam[0], xyz_to_cam[1], xyz_to_cam[2]];
    let largest = rows.iter().flatten().fold(0.0f32, |acc, v| acc.max(v.abs()));
    if largest > INTEGER_COEFFICIENT_THRESHOLD {
        for v in rows.iter_mut().flatten() {
            *v /= INTEGER_COEFFICIENT_SCALE;
        }
    }
    ColorMatrix3x3::from_rows(rows)
}

/// Converts white-balance multipliers into an as-shot neutral, green normalised to 1.
pub(super) fn neutral_from_wb_coeffs(wb_coeffs: &[f32; 4]) -> [f32; 3] {
    let green = wb_coeffs[1];
    if !green.is_finite() || green <= 0.0 {
        return [1.0; 3];
    }
    [0, 1, 2].map(|c| {
        let coeff = wb_coeffs[c];
        if coeff.is_finite() && coeff > 0.0 {
            green / coeff
        } else {
            1.0
        }
    })
}

pub(super) fn orientation_code(orientation: &Orientation) -> u16 {
    match orientation {
        Orientation::Normal => 1,
        Orientation::HorizontalFlip => 2,
        Orientation::Rotate180 => 3,
        Orientation::VerticalFlip => 4,
        Orientation::Transpose => 5,
        Orientation::Rotate90 => 6,
        Orientation::Transverse => 7,
        Orientation::Rotate270 => 8,
        Orientation::Unknown => 0,
    }
}
