#[cfg(test)]
mod tests {
    use tracing::Dispatch;

    use crate::image_pipeline::color::{ColorMatrix3x3, XYZ_D50_TO_SRGB};
    use crate::image_pipeline::common::error::{ConversionError, Result};
    use crate::image_pipeline::debayer::{CfaColor, RedOffset};
    use crate::image_pipeline::develop::{DevelopConfig, DevelopStage, Developer, normalize};
    use crate::image_pipeline::raw::RawImageReader;
    use crate::image_pipeline::raw::types::{
        ActiveArea, BitDepth, CalibrationParameters, RawImageData, RawSampleBuffer,
    };

    const TOLERANCE: f32 = 1e-5;
    const RED: u16 = 20000;
    const GREEN: u16 = 30000;
    const BLUE: u16 = 10000;

    struct MockReader {
        should_fail: bool,
        mock_data: RawImageData,
    }

    impl RawImageReader for MockReader {
        fn read_raw(&self, _data: &[u8]) -> Result<RawImageData> {
            if self.should_fail {
                return Err(ConversionError::DecodeError("Mock decode error".to_string()));
            }
            Ok(self.mock_data.clone())
        }
    }

    fn developer() -> Developer {
        Developer::with_dispatch(DevelopConfig::default(), Dispatch::none())
    }

    /// 16-bit mosaic holding one constant value per CFA colour.
    fn flat_mosaic(width: usize, height: usize, red: RedOffset) -> RawSampleBuffer {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .flat_map(|(x, y)| {
                let value = match red.color_at(x, y) {
                    CfaColor::Red => RED,
                    CfaColor::Green => GREEN,
                    CfaColor::Blue => BLUE,
                };
                value.to_le_bytes()
            })
            .collect();
        RawSampleBuffer {
            width,
            height,
            samples_per_pixel: 1,
            bit_depth: BitDepth::Sixteen,
            swap_endian: false,
            data,
        }
    }

    fn normalized_flat_color() -> [f32; 3] {
        [RED, GREEN, BLUE].map(|v| v as f32 / u16::MAX as f32)
    }

    fn assert_rgb_close(actual: [f32; 4], expected: [f32; 3]) {
        for c in 0..3 {
            assert!(
                (actual[c] - expected[c]).abs() <= TOLERANCE,
                "channel {c}: {} != {}",
                actual[c],
                expected[c]
            );
        }
    }

    #[test]
    fn test_config_builder() {
        let config = DevelopConfig::builder()
            .validate_dimensions(false)
            .max_dimension(Some(1024))
            .crop_to_active_area(false)
            .build();

        assert!(!config.validate_dimensions);
        assert_eq!(config.max_dimension, Some(1024));
        assert!(!config.crop_to_active_area);
        assert!(config.apply_orientation);
    }

    #[test]
    fn test_normalize_clamps_to_levels() {
        let black = 1000;
        let white = black + 3000;
        let values = [0.0, 1000.0, 2500.0, 4000.0, 9000.0];

        let normalized = normalize(&values, black, white);
        let expected = [0.0, 0.0, 0.5, 1.0, 1.0];
        assert_eq!(normalized[1], 0.0);
        assert_eq!(normalized[4], 1.0);
        for (value, expected) in normalized.iter().zip(expected) {
            assert!((value - expected).abs() <= TOLERANCE);
        }
    }

    #[test]
    fn test_end_to_end_flat_mosaic() {
        let samples = flat_mosaic(4, 4, RedOffset::default());
        let calibration = CalibrationParameters::for_sensor(4, 4);

        let image = developer().develop(&samples, &calibration).unwrap();

        assert_eq!((image.width(), image.height()), (4, 4));
        let demosaiced = normalized_flat_color();
        assert!(demosaiced.iter().all(|&v| v > 0.0 && v < 1.0));
        let expected = XYZ_D50_TO_SRGB.transform(demosaiced);
        for pixel in image.pixels() {
            assert_rgb_close(*pixel, expected);
            assert_eq!(pixel[3], 1.0);
        }
    }

    #[test]
    fn test_srgb_color_matrix_leaves_demosaic_untouched() {
        // a ColorMatrix equal to XYZ->sRGB makes camera->sRGB the identity
        let samples = flat_mosaic(6, 4, RedOffset::default());
        let mut calibration = CalibrationParameters::for_sensor(6, 4);
        calibration.color_matrix2 = XYZ_D50_TO_SRGB;

        let image = developer().develop(&samples, &calibration).unwrap();

        for pixel in image.pixels() {
            assert_rgb_close(*pixel, normalized_flat_color());
            assert!(pixel[..3].iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn test_white_balance_is_undone_after_demosaic() {
        let samples = flat_mosaic(4, 4, RedOffset::default());
        let neutral = CalibrationParameters::for_sensor(4, 4);
        let mut balanced = neutral.clone();
        balanced.as_shot_neutral = [0.5, 1.0, 0.25];

        let reference = developer().develop(&samples, &neutral).unwrap();
        let image = developer().develop(&samples, &balanced).unwrap();

        for (pixel, expected) in image.pixels().iter().zip(reference.pixels()) {
            assert_rgb_close(*pixel, [expected[0], expected[1], expected[2]]);
        }
    }

    #[test]
    fn test_crop_and_orientation_are_applied() {
        let area = ActiveArea { top: 0, left: 1, bottom: 2, right: 4 };
        let samples = flat_mosaic(4, 2, RedOffset::from_active_area(&area));
        let mut calibration = CalibrationParameters::for_sensor(4, 2);
        calibration.active_area = area;
        calibration.orientation = 6;

        let image = developer().develop(&samples, &calibration).unwrap();

        assert_eq!((image.width(), image.height()), (2, 3));
        let expected = XYZ_D50_TO_SRGB.transform(normalized_flat_color());
        for pixel in image.pixels() {
            assert_rgb_close(*pixel, expected);
        }
    }

    #[test]
    fn test_crop_and_orientation_can_be_disabled() {
        let samples = flat_mosaic(4, 2, RedOffset::default());
        let mut calibration = CalibrationParameters::for_sensor(4, 2);
        calibration.active_area = ActiveArea { top: 0, left: 0, bottom: 2, right: 2 };
        calibration.orientation = 8;

        let config = DevelopConfig::builder()
            .crop_to_active_area(false)
            .apply_orientation(false)
            .build();
        let image = Developer::with_dispatch(config, Dispatch::none())
            .develop(&samples, &calibration)
            .unwrap();

        assert_eq!((image.width(), image.height()), (4, 2));
    }

    #[test]
    fn test_three_samples_per_pixel_copies_rgb() {
        let values: [u16; 6] = [0, 32768, 65535, 16384, 8192, 4096];
        let samples = RawSampleBuffer {
            width: 2,
            height: 1,
            samples_per_pixel: 3,
            bit_depth: BitDepth::Sixteen,
            swap_endian: false,
            data: values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        };
        let mut calibration = CalibrationParameters::for_sensor(2, 1);
        calibration.samples_per_pixel = 3;

        let image = developer().develop(&samples, &calibration).unwrap();

        assert_eq!(image.get(0, 0), [0.0, 0.5, 65535.0 / 65536.0, 1.0]);
        assert_eq!(image.get(1, 0), [0.25, 0.125, 0.0625, 1.0]);
    }

    #[test]
    fn test_unsupported_samples_per_pixel() {
        let mut samples = flat_mosaic(4, 4, RedOffset::default());
        samples.samples_per_pixel = 2;
        let calibration = CalibrationParameters::for_sensor(4, 4);

        let result = developer().develop(&samples, &calibration);
        assert!(matches!(result, Err(ConversionError::UnsupportedVariant(_))));
    }

    #[test]
    fn test_short_buffer_is_malformed() {
        let mut samples = flat_mosaic(4, 4, RedOffset::default());
        samples.data.truncate(10);
        let calibration = CalibrationParameters::for_sensor(4, 4);

        let result = developer().develop(&samples, &calibration);
        assert!(matches!(result, Err(ConversionError::MalformedInput(_))));
    }

    #[test]
    fn test_singular_color_matrix_fails_without_image() {
        let samples = flat_mosaic(4, 4, RedOffset::default());
        let mut calibration = CalibrationParameters::for_sensor(4, 4);
        calibration.color_matrix2 =
            ColorMatrix3x3::from_rows([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]);

        let error = developer().develop(&samples, &calibration).unwrap_err();
        assert!(matches!(error, ConversionError::SingularMatrix("ColorMatrix2")));
        assert!(error.to_string().contains("ColorMatrix2"));
    }

    #[test]
    fn test_inverted_levels_are_rejected() {
        let samples = flat_mosaic(4, 4, RedOffset::default());
        let mut calibration = CalibrationParameters::for_sensor(4, 4);
        calibration.black_level = [4096; 4];
        calibration.white_level = [4096; 4];

        let result = developer().develop(&samples, &calibration);
        assert!(matches!(result, Err(ConversionError::MalformedInput(_))));
    }

    #[test]
    fn test_zero_neutral_is_rejected() {
        let samples = flat_mosaic(4, 4, RedOffset::default());
        let mut calibration = CalibrationParameters::for_sensor(4, 4);
        calibration.as_shot_neutral = [1.0, 0.0, 1.0];

        let result = developer().develop(&samples, &calibration);
        assert!(matches!(result, Err(ConversionError::MalformedInput(_))));
    }

    #[test]
    fn test_dimension_validation() {
        let samples = flat_mosaic(4, 4, RedOffset::default());
        let calibration = CalibrationParameters::for_sensor(4, 4);
        let config = DevelopConfig::builder().max_dimension(Some(3)).build();

        let result = Developer::with_dispatch(config, Dispatch::none()).develop(&samples, &calibration);
        assert!(matches!(result, Err(ConversionError::InvalidDimensions(4, 4))));
    }

    #[test]
    fn test_timings_cover_every_stage() {
        let samples = flat_mosaic(8, 8, RedOffset::default());
        let calibration = CalibrationParameters::for_sensor(8, 8);

        let (_, timings) = developer().develop_with_timings(&samples, &calibration).unwrap();

        for stage in [
            DevelopStage::RawDecoded,
            DevelopStage::Normalized,
            DevelopStage::WhiteBalanced,
            DevelopStage::Demosaiced,
            DevelopStage::ColorCorrected,
            DevelopStage::Final,
        ] {
            assert!(timings.get_step(stage.name()).is_some(), "missing {stage}");
        }
    }

    #[test]
    fn test_decode_through_reader() {
        let reader = MockReader {
            should_fail: false,
            mock_data: RawImageData {
                samples: flat_mosaic(4, 4, RedOffset::default()),
                calibration: CalibrationParameters::for_sensor(4, 4),
            },
        };
        let image = developer().decode(&reader, b"fake dng data").unwrap();
        assert_eq!((image.width(), image.height()), (4, 4));

        let failing = MockReader { should_fail: true, ..reader };
        let result = developer().decode(&failing, b"fake dng data");
        assert!(matches!(result, Err(ConversionError::DecodeError(_))));
    }
}
