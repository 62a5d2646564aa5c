//! Image processing pipeline module
//!
//! RAW sensor data is unpacked, normalised, demosaiced with AHD, colour
//! corrected into linear sRGB, then cropped and oriented. Around that develop
//! core sit the format probes that load any supported input and the writers
//! that save HDR containers or tonemapped 8-bit files.

pub mod common;
pub mod raw;
pub mod color;
pub mod debayer;
pub mod develop;
pub mod geometry;
pub mod formats;
pub mod export;
pub mod conversions;

pub use common::{
    ConversionError,
    FloatImage,
    PipelineTimings,
    Result,
};

pub use raw::{
    CalibrationParameters,
    RawImageData,
    RawImageReader,
    RawLoaderReader,
    RawSampleBuffer,
};

pub use develop::{
    DevelopConfig,
    DevelopConfigBuilder,
    Developer,
};

pub use formats::{
    FormatProbe,
    ImageLoader,
};

pub use export::{
    ExportConfig,
    ExportConfigBuilder,
    ImageWriter,
    OutputFormat,
    StandardImageWriter,
    TiffCompression,
};

pub use conversions::{
    ConversionPipeline,
};
