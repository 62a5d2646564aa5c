use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::common::image::FloatImage;

/// Result of offering a byte buffer to one format probe.
#[derive(Debug)]
pub enum ProbeOutcome {
    Decoded(FloatImage),
    /// The bytes do not look like this format; try the next probe
    NotThisFormat,
    /// The bytes are this format but could not be decoded
    Malformed(String),
}

impl From<ConversionError> for ProbeOutcome {
    fn from(error: ConversionError) -> Self {
        ProbeOutcome::Malformed(error.to_string())
    }
}

pub trait FormatProbe {
    fn name(&self) -> &'static str;

    /// `extension` is lower case, without the dot.
    fn probe(&self, data: &[u8], extension: &str) -> ProbeOutcome;
}
