//! Image writing module
//!
//! Encodes developed images into HDR containers (PFM, TIFF, OpenEXR,
//! Radiance) or tonemapped 8-bit files, picked by output extension.

mod writer;
mod standard_image_writer;
pub mod tonemap;
pub mod types;


pub use writer::ImageWriter;
pub use standard_image_writer::StandardImageWriter;
pub use types::{ExportConfig, ExportConfigBuilder, OutputFormat, TiffCompression};
