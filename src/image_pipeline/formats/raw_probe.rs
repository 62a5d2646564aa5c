use tracing::debug;

use crate::image_pipeline::develop::Developer;
use crate::image_pipeline::formats::probe::{FormatProbe, ProbeOutcome};
use crate::image_pipeline::raw::RawImageReader;

/// Extensions whose decode failures are worth reporting.
pub const RAW_EXTENSIONS: &[&str] = &[
    "3fr", "arw", "cr2", "crw", "dcr", "dng", "erf", "iiq", "kdc", "mef", "mos", "mrw", "nef",
    "nrw", "orf", "pef", "raf", "rw2", "sr2", "srf", "srw", "x3f",
];

/// Camera RAW containers, decoded by a reader and developed.
///
/// Any input may be offered to the RAW decoder, so a failure only counts as
/// malformed when the extension names a RAW format.
pub struct RawProbe<R: RawImageReader> {
    reader: R,
    developer: Developer,
}

impl<R: RawImageReader> RawProbe<R> {
    pub fn new(reader: R, developer: Developer) -> Self {
        Self { reader, developer }
    }
}

impl<R: RawImageReader> FormatProbe for RawProbe<R> {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn probe(&self, data: &[u8], extension: &str) -> ProbeOutcome {
        match self.developer.decode(&self.reader, data) {
            Ok(image) => ProbeOutcome::Decoded(image),
            Err(e) if RAW_EXTENSIONS.contains(&extension) => ProbeOutcome::from(e),
            Err(e) => {
                debug!("Not a RAW file: {}", e);
                ProbeOutcome::NotThisFormat
            }
        }
    }
}
