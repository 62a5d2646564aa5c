use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::image::FloatImage;
use crate::image_pipeline::common::timing::Timer;
use crate::image_pipeline::develop::Developer;
use crate::image_pipeline::formats::codec_probe::CodecProbe;
use crate::image_pipeline::formats::pfm::PfmProbe;
use crate::image_pipeline::formats::probe::{FormatProbe, ProbeOutcome};
use crate::image_pipeline::formats::raw_probe::RawProbe;
use crate::image_pipeline::formats::tiff_probe::TiffProbe;
use crate::image_pipeline::raw::RawLoaderReader;

/// Tries each probe in turn until one decodes the input.
pub struct ImageLoader {
    probes: Vec<Box<dyn FormatProbe>>,
}

impl ImageLoader {
    /// Codec formats, then PFM, then camera RAW, then TIFF.
    pub fn new(developer: Developer) -> Self {
        Self::with_probes(vec![
            Box::new(CodecProbe),
            Box::new(PfmProbe),
            Box::new(RawProbe::new(RawLoaderReader, developer)),
            Box::new(TiffProbe),
        ])
    }

    pub fn with_probes(probes: Vec<Box<dyn FormatProbe>>) -> Self {
        Self { probes }
    }

    pub fn probe_names(&self) -> Vec<&'static str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Decodes `data`; `name` only labels the error when every probe fails.
    #[instrument(skip(self, data), fields(input_size = data.len()))]
    pub fn load(&self, data: &[u8], extension: &str, name: &str) -> Result<FloatImage> {
        let extension = extension.to_ascii_lowercase();
        let mut reasons = Vec::new();

        for probe in &self.probes {
            let timer = Timer::start(probe.name());
            match probe.probe(data, &extension) {
                ProbeOutcome::Decoded(image) => {
                    let (probe_name, duration) = timer.stop();
                    info!(
                        "Loaded {}x{} image with {} probe in {:.3}ms",
                        image.width(),
                        image.height(),
                        probe_name,
                        duration.as_secs_f64() * 1000.0
                    );
                    return Ok(image);
                }
                ProbeOutcome::NotThisFormat => {
                    debug!("{} probe declined input", probe.name());
                }
                ProbeOutcome::Malformed(reason) => {
                    debug!("{} probe failed: {}", probe.name(), reason);
                    reasons.push(format!("\t{}: {}", probe.name(), reason));
                }
            }
        }

        let error = ConversionError::UnrecognizedImage {
            path: name.to_string(),
            reasons,
        };
        warn!("{}", error);
        Err(error)
    }

    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FloatImage> {
        let path = path.as_ref();
        let data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", path.display(), e))
            })?
        };
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        self.load(&data, extension, &path.display().to_string())
    }
}
