//! Image loading module
//!
//! An ordered list of format probes. Each probe either decodes the bytes,
//! declines them as not its format, or reports them as malformed; the loader
//! stops at the first decode and otherwise reports every malformed reason.

mod probe;
mod loader;
mod codec_probe;
pub mod pfm;
mod raw_probe;
mod tiff_probe;


pub use probe::{FormatProbe, ProbeOutcome};
pub use loader::ImageLoader;
pub use codec_probe::CodecProbe;
pub use pfm::PfmProbe;
pub use raw_probe::{RAW_EXTENSIONS, RawProbe};
pub use tiff_probe::TiffProbe;
