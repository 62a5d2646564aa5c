use std::io::Write;
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    common::image::FloatImage,
    develop::Developer,
    export::{ExportConfig, ImageWriter, OutputFormat, StandardImageWriter},
    formats::ImageLoader,
};

/// Loads any supported input and writes it in the container picked by the
/// output extension.
pub struct ConversionPipeline<W: ImageWriter> {
    loader: ImageLoader,
    writer: W,
    config: ExportConfig,
}

impl ConversionPipeline<StandardImageWriter> {
    pub fn new(developer: Developer, config: ExportConfig) -> Self {
        Self {
            loader: ImageLoader::new(developer),
            writer: StandardImageWriter,
            config,
        }
    }
}

impl<W: ImageWriter> ConversionPipeline<W> {
    pub fn with_custom(loader: ImageLoader, writer: W, config: ExportConfig) -> Self {
        Self {
            loader,
            writer,
            config,
        }
    }

    fn validate_image(&self, image: &FloatImage) -> Result<()> {
        if image.is_empty() {
            warn!("Loaded image has no pixels");
            return Err(ConversionError::InvalidDimensions(
                image.width(),
                image.height(),
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(
        &self,
        input_data: &[u8],
        extension: &str,
        format: OutputFormat,
        output: &mut dyn Write,
    ) -> Result<()> {
        info!("Starting conversion to {:?}", format);

        let image = {
            let _span = tracing::info_span!("load_image").entered();
            self.loader.load(input_data, extension, "<memory>")?
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = image.width(),
                height = image.height()
            ).entered();
            self.validate_image(&image)?;
        }

        {
            let _span = tracing::info_span!("encode_image").entered();
            self.writer.write_image(&image, format, output, &self.config)?;
        }

        info!(
            width = image.width(),
            height = image.height(),
            "Conversion complete"
        );
        Ok(())
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        // unknown output extensions fail before anything is read or created
        let format = OutputFormat::from_path(output_path)?;

        let image = self.loader.load_file(input_path)?;
        self.validate_image(&image)?;

        let mut output_file = {
            let _span = tracing::info_span!("create_output_file").entered();
            std::fs::File::create(output_path).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?
        };

        {
            let _span = tracing::info_span!("encode_image").entered();
            self.writer
                .write_image(&image, format, &mut output_file, &self.config)?;
        }

        info!(
            width = image.width(),
            height = image.height(),
            "Wrote {}",
            output_path.display()
        );
        Ok(())
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ExportConfig) {
        self.config = config;
    }
}
