//! RAW image reading module
//!
//! Packed sensor samples, their calibration metadata, the bit unpacker and
//! the container reader that produces both.

mod reader;
mod rawloader_reader;
pub mod types;
pub mod unpack;

#[cfg(test)]
mod tests;

pub use reader::RawImageReader;
pub use rawloader_reader::RawLoaderReader;
pub use types::{ActiveArea, BitDepth, CalibrationParameters, RawImageData, RawSampleBuffer};
pub use unpack::{unpack_samples, unpack_to_float};
