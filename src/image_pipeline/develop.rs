//! Develop pipeline
//!
//! Turns packed sensor samples plus their calibration into a colour-corrected
//! linear sRGB image: normalize, white balance, demosaic, colour correct,
//! then crop and orient.

mod pipeline;
pub mod types;

#[cfg(test)]
mod tests;

pub use pipeline::{Developer, normalize};
pub use types::{DevelopConfig, DevelopConfigBuilder, DevelopStage};
