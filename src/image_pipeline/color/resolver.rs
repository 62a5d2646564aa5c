//! Camera-to-XYZ resolution from DNG calibration tags.
//!
//! The full DNG colour model ("Mapping Camera Color Space to CIE XYZ Space")
//! is only partly supported: matrices for the second calibration illuminant
//! are used as-is, without interpolating between illuminants.

use tracing::debug;

use crate::image_pipeline::color::matrix::{ColorMatrix3x3, XYZ_D50_TO_SRGB, XYZ_D50_TO_XYZ_D65};
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::types::CalibrationParameters;

/// The two ways a camera-to-XYZ matrix can be derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorCorrectionPath {
    /// ForwardMatrix combined with calibration, analog balance and the as-shot neutral
    ForwardMatrix {
        forward_matrix: ColorMatrix3x3,
        camera_calibration: ColorMatrix3x3,
        analog_balance: [f32; 3],
        camera_neutral: [f32; 3],
    },
    /// Plain inversion of the XYZ-to-camera ColorMatrix
    ColorMatrix { color_matrix: ColorMatrix3x3 },
}

impl ColorCorrectionPath {
    pub fn from_calibration(calibration: &CalibrationParameters) -> Self {
        if calibration.has_forward_matrix {
            ColorCorrectionPath::ForwardMatrix {
                forward_matrix: calibration.forward_matrix2,
                camera_calibration: calibration.camera_calibration2,
                analog_balance: calibration.analog_balance,
                camera_neutral: calibration.as_shot_neutral,
            }
        } else {
            ColorCorrectionPath::ColorMatrix {
                color_matrix: calibration.color_matrix2,
            }
        }
    }

    pub fn camera_to_xyz_d50(&self) -> Result<ColorMatrix3x3> {
        match *self {
            ColorCorrectionPath::ForwardMatrix {
                forward_matrix,
                camera_calibration,
                analog_balance,
                camera_neutral,
            } => {
                // ReferenceNeutral = (AB * CC)^-1 * CameraNeutral
                // CameraToXYZ = FM * diag(ReferenceNeutral)^-1 * (AB * CC)^-1
                let balance_inverse = (ColorMatrix3x3::from_diagonal(analog_balance)
                    * camera_calibration)
                    .try_inverse("AnalogBalance * CameraCalibration")?;
                let reference_neutral = balance_inverse.transform(camera_neutral);
                if reference_neutral.iter().any(|&v| v == 0.0 || !v.is_finite()) {
                    return Err(ConversionError::SingularMatrix("diag(ReferenceNeutral)"));
                }
                let d = ColorMatrix3x3::from_diagonal(reference_neutral.map(|v| 1.0 / v));
                Ok(forward_matrix * d * balance_inverse)
            }
            ColorCorrectionPath::ColorMatrix { color_matrix } => {
                color_matrix.try_inverse("ColorMatrix2")
            }
        }
    }
}

/// Camera-to-XYZ (D50) for `calibration`.
pub fn camera_to_xyz_d50(calibration: &CalibrationParameters) -> Result<ColorMatrix3x3> {
    ColorCorrectionPath::from_calibration(calibration).camera_to_xyz_d50()
}

/// Every per-image transform the develop pipeline needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransforms {
    pub camera_to_xyz_d50: ColorMatrix3x3,
    /// Guides the demosaic direction choice
    pub camera_to_xyz_d65: ColorMatrix3x3,
    /// Final colour correction
    pub camera_to_srgb: ColorMatrix3x3,
}

impl ColorTransforms {
    pub fn resolve(calibration: &CalibrationParameters) -> Result<Self> {
        let camera_to_xyz_d50 = camera_to_xyz_d50(calibration)?;
        debug!("CameraToXYZD50 = {:?}", camera_to_xyz_d50);
        Ok(Self {
            camera_to_xyz_d50,
            camera_to_xyz_d65: XYZ_D50_TO_XYZ_D65 * camera_to_xyz_d50,
            camera_to_srgb: XYZ_D50_TO_SRGB * camera_to_xyz_d50,
        })
    }
}
