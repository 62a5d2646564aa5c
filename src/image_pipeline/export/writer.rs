use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::image::FloatImage;
use crate::image_pipeline::export::types::{ExportConfig, OutputFormat};

pub trait ImageWriter {
    fn write_image(
        &self,
        image: &FloatImage,
        format: OutputFormat,
        output: &mut dyn Write,
        config: &ExportConfig,
    ) -> Result<()>;
}
