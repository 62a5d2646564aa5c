use rayon::prelude::*;
use tracing::{Dispatch, debug, info, instrument, warn};

use crate::image_pipeline::color::{ColorMatrix3x3, ColorTransforms};
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::image::FloatImage;
use crate::image_pipeline::common::timing::PipelineTimings;
use crate::image_pipeline::debayer::{AhdDebayer, CfaColor, Mosaic, RedOffset};
use crate::image_pipeline::develop::types::{DevelopConfig, DevelopStage};
use crate::image_pipeline::geometry::{Orientation, crop, crop_and_orient};
use crate::image_pipeline::raw::RawImageReader;
use crate::image_pipeline::raw::types::{BitDepth, CalibrationParameters, RawSampleBuffer};
use crate::image_pipeline::raw::unpack::unpack_to_float;

/// Runs the develop pipeline, logging through its own dispatcher.
pub struct Developer {
    config: DevelopConfig,
    dispatch: Dispatch,
}

impl Developer {
    /// Logs to whatever subscriber is the default when the developer is built.
    pub fn new(config: DevelopConfig) -> Self {
        let dispatch = tracing::dispatcher::get_default(|current| current.clone());
        Self::with_dispatch(config, dispatch)
    }

    pub fn with_dispatch(config: DevelopConfig, dispatch: Dispatch) -> Self {
        Self { config, dispatch }
    }

    pub fn config(&self) -> &DevelopConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DevelopConfig) {
        self.config = config;
    }

    /// Decodes a RAW container with `reader` and develops it.
    pub fn decode<R: RawImageReader>(&self, reader: &R, data: &[u8]) -> Result<FloatImage> {
        let raw = tracing::dispatcher::with_default(&self.dispatch, || {
            let _span = tracing::info_span!("decode_raw", input_size = data.len()).entered();
            reader.read_raw(data)
        })?;
        self.develop(&raw.samples, &raw.calibration)
    }

    pub fn develop(
        &self,
        samples: &RawSampleBuffer,
        calibration: &CalibrationParameters,
    ) -> Result<FloatImage> {
        self.develop_with_timings(samples, calibration)
            .map(|(image, _)| image)
    }

    /// Like [`Developer::develop`], also returning how long each stage took.
    pub fn develop_with_timings(
        &self,
        samples: &RawSampleBuffer,
        calibration: &CalibrationParameters,
    ) -> Result<(FloatImage, PipelineTimings)> {
        tracing::dispatcher::with_default(&self.dispatch, || self.run(samples, calibration))
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!(
                    "Image dimensions {}x{} exceed maximum {}",
                    width, height, max
                );
                return Err(ConversionError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    #[instrument(skip_all, fields(width = samples.width, height = samples.height))]
    fn run(
        &self,
        samples: &RawSampleBuffer,
        calibration: &CalibrationParameters,
    ) -> Result<(FloatImage, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        info!(
            "Developing {}x{} image, {} sample(s) per pixel at {} bits",
            samples.width,
            samples.height,
            samples.samples_per_pixel,
            samples.bit_depth.bits()
        );

        self.validate_dimensions(samples.width, samples.height)?;
        if !matches!(samples.samples_per_pixel, 1 | 3) {
            return Err(ConversionError::UnsupportedVariant(format!(
                "{} samples per pixel",
                samples.samples_per_pixel
            )));
        }

        let values = timings.measure(DevelopStage::RawDecoded.name(), || unpack_to_float(samples))?;

        let developed = if samples.samples_per_pixel == 3 {
            debug!("Decoding a 3 sample-per-pixel image");
            timings.measure("copy_rgb", || {
                linear_rgb(&values, samples.width, samples.height, samples.bit_depth)
            })
        } else {
            debug!("Decoding a 1 sample-per-pixel image");
            develop_mosaic(values, samples.width, samples.height, calibration, &mut timings)?
        };

        let image = timings.measure(DevelopStage::Final.name(), || {
            self.crop_and_orient(developed, calibration)
        })?;

        info!(
            "Develop complete: {}x{} in {:.3}ms",
            image.width(),
            image.height(),
            timings.total_duration().as_secs_f64() * 1000.0
        );
        timings.log_summary();
        Ok((image, timings))
    }

    fn crop_and_orient(
        &self,
        image: FloatImage,
        calibration: &CalibrationParameters,
    ) -> Result<FloatImage> {
        let area = &calibration.active_area;
        let code = calibration.orientation;
        match (self.config.crop_to_active_area, self.config.apply_orientation) {
            (true, true) => crop_and_orient(image, area, code),
            (true, false) => crop(image, area),
            (false, true) => Ok(Orientation::from_code(code).apply(image)),
            (false, false) => Ok(image),
        }
    }
}

fn develop_mosaic(
    values: Vec<f32>,
    width: usize,
    height: usize,
    calibration: &CalibrationParameters,
    timings: &mut PipelineTimings,
) -> Result<FloatImage> {
    let black = calibration.black_level[0];
    let white = calibration.white_level[0];
    if white <= black {
        return Err(ConversionError::MalformedInput(format!(
            "white level {} must exceed black level {}",
            white, black
        )));
    }
    let wb = calibration.as_shot_neutral;
    if wb.iter().any(|&v| !v.is_finite() || v <= 0.0) {
        return Err(ConversionError::MalformedInput(format!(
            "as-shot neutral {:?} must be positive",
            wb
        )));
    }

    let transforms = ColorTransforms::resolve(calibration)?;
    let red = RedOffset::from_active_area(&calibration.active_area);

    let mut data = timings.measure(DevelopStage::Normalized.name(), || {
        normalize(&values, black, white)
    });
    timings.measure(DevelopStage::WhiteBalanced.name(), || {
        divide_white_balance(&mut data, width, red, wb)
    });

    let mosaic = Mosaic::new(width, height, data)?;
    let image = timings.measure(DevelopStage::Demosaiced.name(), || {
        AhdDebayer::new(transforms.camera_to_xyz_d65).process(&mosaic, red)
    })?;

    Ok(timings.measure(DevelopStage::ColorCorrected.name(), || {
        color_correct(image, wb, &transforms.camera_to_srgb)
    }))
}

/// Maps raw counts onto [0, 1] between the black and white levels.
pub fn normalize(values: &[f32], black: u32, white: u32) -> Vec<f32> {
    let black = black as f32;
    let scale = 1.0 / (white as f32 - black);
    values
        .par_iter()
        .map(|&v| ((v - black) * scale).clamp(0.0, 1.0))
        .collect()
}

fn divide_white_balance(data: &mut [f32], width: usize, red: RedOffset, wb: [f32; 3]) {
    let inverse = wb.map(|v| 1.0 / v);
    data.par_chunks_mut(width.max(1))
        .enumerate()
        .for_each(|(y, row)| {
            for (x, value) in row.iter_mut().enumerate() {
                *value *= match red.color_at(x, y) {
                    CfaColor::Red => inverse[0],
                    CfaColor::Green => inverse[1],
                    CfaColor::Blue => inverse[2],
                };
            }
        });
}

/// Undoes the white balance division, then maps camera RGB to linear sRGB.
fn color_correct(mut image: FloatImage, wb: [f32; 3], camera_to_srgb: &ColorMatrix3x3) -> FloatImage {
    image.par_rows_mut().for_each(|(_, row)| {
        for pixel in row.iter_mut() {
            let rgb = camera_to_srgb.transform([
                pixel[0] * wb[0],
                pixel[1] * wb[1],
                pixel[2] * wb[2],
            ]);
            *pixel = [rgb[0], rgb[1], rgb[2], 1.0];
        }
    });
    image
}

/// Interleaved RGB samples scaled by `1 / 2^bits`.
fn linear_rgb(values: &[f32], width: usize, height: usize, depth: BitDepth) -> FloatImage {
    let scale = 1.0 / (1u32 << depth.bits()) as f32;
    FloatImage::from_fn(width, height, |x, y| {
        let i = 3 * (y * width + x);
        [
            values[i] * scale,
            values[i + 1] * scale,
            values[i + 2] * scale,
            1.0,
        ]
    })
}
