//! Camera colour handling
//!
//! Fixed-size colour matrices, the process-wide colour-space constants and
//! the resolver that turns DNG calibration tags into a camera-to-XYZ transform,
//! plus the sRGB transfer curve used when reading and writing 8-bit files.

pub mod matrix;
pub mod resolver;
pub mod transfer;


pub use matrix::{ColorMatrix3x3, XYZ_D50_TO_SRGB, XYZ_D50_TO_XYZ_D65, XYZ_D65_TO_SRGB};
pub use resolver::{ColorCorrectionPath, ColorTransforms, camera_to_xyz_d50};
pub use transfer::{linear_to_srgb, linear_to_srgb_rgba, srgb_to_linear, srgb_to_linear_rgba};
