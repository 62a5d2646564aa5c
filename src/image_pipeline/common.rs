//! Common utilities module
//!
//! This module contains shared types and utilities used across the image pipeline.

pub mod error;
pub mod image;
pub mod timing;

pub use error::{ConversionError, Result};
pub use image::{FloatImage, Rgba};
pub use timing::{PipelineTimings, StepTiming, Timer};
