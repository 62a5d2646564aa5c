#[cfg(test)]
mod tests {
    use rawloader::Orientation;

    use crate::image_pipeline::color::ColorMatrix3x3;
    use crate::image_pipeline::common::error::ConversionError;
    use crate::image_pipeline::raw::rawloader_reader::{
        color_matrix_from_xyz_to_cam, neutral_from_wb_coeffs, orientation_code,
    };
    use crate::image_pipeline::raw::types::{ActiveArea, BitDepth, RawSampleBuffer};
    use crate::image_pipeline::raw::unpack::{unpack_samples, unpack_to_float};

    /// Packs samples most-significant-bit first, the layout DNG uses for 12/14-bit data.
    fn pack_msb_first(samples: &[u32], bits: u32) -> Vec<u8> {
        let mut out = Vec::new();
        let mut acc: u64 = 0;
        let mut pending = 0;
        for &s in samples {
            acc = (acc << bits) | s as u64;
            pending += bits;
            while pending >= 8 {
                pending -= 8;
                out.push((acc >> pending) as u8);
            }
            acc &= (1u64 << pending) - 1;
        }
        if pending > 0 {
            out.push((acc << (8 - pending)) as u8);
        }
        out
    }

    /// Pads to whole 16-bit words and swaps the bytes of each word.
    fn swap_words(bytes: &[u8]) -> Vec<u8> {
        let mut padded = bytes.to_vec();
        if padded.len() % 2 == 1 {
            padded.push(0);
        }
        padded.chunks_exact(2).flat_map(|w| [w[1], w[0]]).collect()
    }

    fn test_samples(count: usize, bits: u32) -> Vec<u32> {
        let max = (1u32 << bits) - 1;
        (0..count as u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 7) & max)
            .collect()
    }

    #[test]
    fn test_bit_depth_from_bits() {
        assert_eq!(BitDepth::try_from(12).unwrap(), BitDepth::Twelve);
        assert_eq!(BitDepth::try_from(14).unwrap(), BitDepth::Fourteen);
        assert_eq!(BitDepth::try_from(16).unwrap(), BitDepth::Sixteen);
        assert!(matches!(
            BitDepth::try_from(10),
            Err(ConversionError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_packed_len() {
        assert_eq!(BitDepth::Twelve.packed_len(2), 3);
        assert_eq!(BitDepth::Twelve.packed_len(3), 5);
        assert_eq!(BitDepth::Fourteen.packed_len(4), 7);
        assert_eq!(BitDepth::Sixteen.packed_len(5), 10);
    }

    #[test]
    fn test_unpack_12_bit_known_pair() {
        let data = [0xAB, 0xC1, 0x23];
        let samples = unpack_samples(&data, 2, 1, BitDepth::Twelve, false).unwrap();
        assert_eq!(samples, vec![0xABC as f32, 0x123 as f32]);
    }

    #[test]
    fn test_unpack_14_bit_known_group() {
        let expected = [0x3FFF, 0x0001, 0x2AAA, 0x1234];
        let data = pack_msb_first(&expected, 14);
        assert_eq!(data.len(), 7);

        let samples = unpack_samples(&data, 4, 1, BitDepth::Fourteen, false).unwrap();
        let expected: Vec<f32> = expected.iter().map(|&v| v as f32).collect();
        assert_eq!(samples, expected);
    }

    #[test]
    fn test_unpack_matches_packed_samples() {
        for bits in [12, 14] {
            let depth = BitDepth::try_from(bits).unwrap();
            let (width, rows) = (5, 3);
            let expected = test_samples(width * rows, bits);
            let data = pack_msb_first(&expected, bits);

            let samples = unpack_samples(&data, width, rows, depth, false).unwrap();
            assert_eq!(samples.len(), width * rows);
            for (got, want) in samples.iter().zip(&expected) {
                assert_eq!(*got, *want as f32, "{bits}-bit mismatch");
            }
        }
    }

    #[test]
    fn test_output_length_and_range() {
        for depth in [BitDepth::Twelve, BitDepth::Fourteen, BitDepth::Sixteen] {
            for (width, rows) in [(1, 1), (2, 3), (7, 5), (16, 4)] {
                let data = vec![0xFF; depth.packed_len(width * rows)];
                let samples = unpack_samples(&data, width, rows, depth, false).unwrap();

                assert_eq!(samples.len(), width * rows);
                assert!(samples.iter().all(|&v| v >= 0.0 && v <= depth.max_value() as f32));
                assert!(samples.iter().all(|&v| v == depth.max_value() as f32));
            }
        }
    }

    #[test]
    fn test_16_bit_endian_swap_round_trip() {
        let values: Vec<u16> = vec![0, 1, 255, 256, 4660, 65535];
        let little: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let big: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();

        let native = unpack_samples(&little, 3, 2, BitDepth::Sixteen, false).unwrap();
        let swapped = unpack_samples(&big, 3, 2, BitDepth::Sixteen, true).unwrap();

        assert_eq!(native, swapped);
        assert_eq!(native, values.iter().map(|&v| v as f32).collect::<Vec<_>>());
    }

    #[test]
    fn test_packed_endian_swap_round_trip() {
        // odd widths put every other group at an odd byte offset
        for bits in [12, 14] {
            let depth = BitDepth::try_from(bits).unwrap();
            let (width, rows) = (7, 3);
            let expected = test_samples(width * rows, bits);
            let data = pack_msb_first(&expected, bits);
            let swapped = swap_words(&data);

            let native = unpack_samples(&data, width, rows, depth, false).unwrap();
            let from_swapped = unpack_samples(&swapped, width, rows, depth, true).unwrap();
            assert_eq!(native, from_swapped, "{bits}-bit swap mismatch");
        }
    }

    #[test]
    fn test_short_buffer_is_malformed() {
        let data = vec![0u8; 5];
        let result = unpack_samples(&data, 4, 1, BitDepth::Twelve, false);
        assert!(matches!(result, Err(ConversionError::MalformedInput(_))));

        // a swapped stream must also cover the partner byte of its last word
        let data = vec![0u8; 3];
        let result = unpack_samples(&data, 2, 1, BitDepth::Twelve, true);
        assert!(matches!(result, Err(ConversionError::MalformedInput(_))));
    }

    #[test]
    fn test_unpack_buffer_covers_all_planes() {
        let buffer = RawSampleBuffer {
            width: 2,
            height: 2,
            samples_per_pixel: 3,
            bit_depth: BitDepth::Sixteen,
            swap_endian: false,
            data: (0..12u16).flat_map(|v| v.to_le_bytes()).collect(),
        };
        let samples = unpack_to_float(&buffer).unwrap();
        assert_eq!(samples.len(), buffer.sample_count());
        assert_eq!(samples[11], 11.0);
    }

    #[test]
    fn test_active_area_clamped() {
        let area = ActiveArea {
            top: 2,
            left: 1,
            bottom: 100,
            right: 50,
        };
        let clamped = area.clamped(10, 8);
        assert_eq!(clamped, ActiveArea { top: 2, left: 1, bottom: 8, right: 10 });
        assert_eq!(clamped.width(), 9);
        assert_eq!(clamped.height(), 6);

        let outside = ActiveArea { top: 20, left: 20, bottom: 30, right: 30 }.clamped(10, 8);
        assert_eq!(outside.width(), 0);
        assert_eq!(outside.height(), 0);
    }

    #[test]
    fn test_integer_color_matrix_is_rescaled() {
        let xyz_to_cam = [
            [5000.0, -2500.0, 1250.0],
            [-1250.0, 10000.0, 2500.0],
            [0.0, 2500.0, 5000.0],
            [0.0, 0.0, 0.0],
        ];

        assert_eq!(
            color_matrix_from_xyz_to_cam(&xyz_to_cam),
            ColorMatrix3x3::from_rows([
                [0.5, -0.25, 0.125],
                [-0.125, 1.0, 0.25],
                [0.0, 0.25, 0.5],
            ])
        );
    }

    #[test]
    fn test_dng_color_matrix_is_kept() {
        let rows = [
            [0.6722, -0.0635, -0.0963],
            [-0.4287, 1.2460, 0.2028],
            [-0.0908, 0.2162, 0.5668],
        ];
        // the fourth row only exists for four-colour sensors and is ignored
        let xyz_to_cam = [rows[0], rows[1], rows[2], [9999.0, 9999.0, 9999.0]];

        assert_eq!(
            color_matrix_from_xyz_to_cam(&xyz_to_cam),
            ColorMatrix3x3::from_rows(rows)
        );
    }

    #[test]
    fn test_color_matrix_at_threshold_is_kept() {
        let rows = [[16.0, 0.0, 0.0], [0.0, -16.0, 0.0], [0.0, 0.0, 1.0]];
        let xyz_to_cam = [rows[0], rows[1], rows[2], [0.0; 3]];

        assert_eq!(
            color_matrix_from_xyz_to_cam(&xyz_to_cam),
            ColorMatrix3x3::from_rows(rows)
        );
    }

    #[test]
    fn test_neutral_from_wb_coeffs() {
        assert_eq!(neutral_from_wb_coeffs(&[2.0, 1.0, 4.0, f32::NAN]), [0.5, 1.0, 0.25]);
        // green is the reference even when it is not 1
        assert_eq!(neutral_from_wb_coeffs(&[4.0, 2.0, 1.0, 2.0]), [0.5, 1.0, 2.0]);
    }

    #[test]
    fn test_neutral_falls_back_for_unusable_coeffs() {
        assert_eq!(neutral_from_wb_coeffs(&[f32::NAN, 1.0, 0.0, 1.0]), [1.0, 1.0, 1.0]);
        assert_eq!(neutral_from_wb_coeffs(&[-3.0, 1.0, 2.0, 1.0]), [1.0, 1.0, 0.5]);
        assert_eq!(neutral_from_wb_coeffs(&[2.0, f32::INFINITY, 2.0, 1.0]), [1.0; 3]);
        assert_eq!(neutral_from_wb_coeffs(&[2.0, 0.0, 2.0, 1.0]), [1.0; 3]);
        assert_eq!(neutral_from_wb_coeffs(&[f32::NAN; 4]), [1.0; 3]);
    }

    #[test]
    fn test_rawloader_orientation_codes() {
        let cases = [
            (Orientation::Normal, 1),
            (Orientation::HorizontalFlip, 2),
            (Orientation::Rotate180, 3),
            (Orientation::VerticalFlip, 4),
            (Orientation::Transpose, 5),
            (Orientation::Rotate90, 6),
            (Orientation::Transverse, 7),
            (Orientation::Rotate270, 8),
            (Orientation::Unknown, 0),
        ];
        for (orientation, code) in cases {
            assert_eq!(orientation_code(&orientation), code, "expected code {code}");
        }
    }
}
