#[cfg(test)]
mod tests {
    use crate::image_pipeline::common::error::ConversionError;
    use crate::image_pipeline::common::image::FloatImage;
    use crate::image_pipeline::geometry::{
        Orientation, crop, crop_and_orient, flip_horizontal, flip_vertical, rotate_90_ccw,
        rotate_90_cw,
    };
    use crate::image_pipeline::raw::types::ActiveArea;

    /// Each pixel records its own coordinates.
    fn labelled(width: usize, height: usize) -> FloatImage {
        FloatImage::from_fn(width, height, |x, y| [x as f32, y as f32, 0.0, 1.0])
    }

    fn at(image: &FloatImage, x: usize, y: usize) -> (usize, usize) {
        let p = image.get(x, y);
        (p[0] as usize, p[1] as usize)
    }

    #[test]
    fn test_full_crop_with_identity_is_noop() {
        let image = labelled(5, 3);
        let result = crop_and_orient(image.clone(), &ActiveArea::full(5, 3), 1).unwrap();
        assert_eq!(result, image);
    }

    #[test]
    fn test_crop_keeps_half_open_rectangle() {
        let area = ActiveArea { top: 1, left: 2, bottom: 3, right: 5 };
        let cropped = crop(labelled(6, 4), &area).unwrap();

        assert_eq!((cropped.width(), cropped.height()), (3, 2));
        assert_eq!(at(&cropped, 0, 0), (2, 1));
        assert_eq!(at(&cropped, 2, 1), (4, 2));
    }

    #[test]
    fn test_crop_clamps_to_image() {
        let area = ActiveArea { top: 2, left: 1, bottom: 100, right: 100 };
        let cropped = crop(labelled(4, 4), &area).unwrap();

        assert_eq!((cropped.width(), cropped.height()), (3, 2));
        assert_eq!(at(&cropped, 0, 0), (1, 2));
    }

    #[test]
    fn test_empty_crop_is_rejected() {
        let area = ActiveArea { top: 0, left: 4, bottom: 4, right: 4 };
        assert!(matches!(
            crop(labelled(4, 4), &area),
            Err(ConversionError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_four_clockwise_turns_are_identity() {
        let image = labelled(4, 3);
        let turned = (0..4).fold(image.clone(), |acc, _| rotate_90_cw(&acc));
        assert_eq!(turned, image);
    }

    #[test]
    fn test_quarter_turns_cancel() {
        let image = labelled(5, 2);
        assert_eq!(rotate_90_ccw(&rotate_90_cw(&image)), image);
        assert_eq!(flip_horizontal(&flip_horizontal(&image)), image);
        assert_eq!(flip_vertical(&flip_vertical(&image)), image);
    }

    #[test]
    fn test_rotations_move_corners() {
        let image = labelled(3, 2);

        let cw = rotate_90_cw(&image);
        assert_eq!((cw.width(), cw.height()), (2, 3));
        assert_eq!(at(&cw, 0, 0), (0, 1));
        assert_eq!(at(&cw, 1, 0), (0, 0));

        let ccw = rotate_90_ccw(&image);
        assert_eq!((ccw.width(), ccw.height()), (2, 3));
        assert_eq!(at(&ccw, 0, 0), (2, 0));
        assert_eq!(at(&ccw, 0, 2), (0, 0));
    }

    #[test]
    fn test_orientation_codes() {
        let image = labelled(3, 2);

        let mirrored = Orientation::from_code(2).apply(image.clone());
        assert_eq!(at(&mirrored, 0, 0), (2, 0));

        let upside_down = Orientation::from_code(3).apply(image.clone());
        assert_eq!(at(&upside_down, 0, 0), (2, 1));

        let flipped = Orientation::from_code(4).apply(image.clone());
        assert_eq!(at(&flipped, 0, 0), (0, 1));

        // 5 is a transpose
        let transposed = Orientation::from_code(5).apply(image.clone());
        assert_eq!((transposed.width(), transposed.height()), (2, 3));
        for y in 0..3 {
            for x in 0..2 {
                assert_eq!(at(&transposed, x, y), (y, x));
            }
        }

        assert_eq!(Orientation::from_code(6).apply(image.clone()), rotate_90_cw(&image));

        // 7 is the anti-transpose
        let transverse = Orientation::from_code(7).apply(image.clone());
        for y in 0..3 {
            for x in 0..2 {
                assert_eq!(at(&transverse, x, y), (2 - y, 1 - x));
            }
        }

        assert_eq!(Orientation::from_code(8).apply(image.clone()), rotate_90_ccw(&image));
    }

    #[test]
    fn test_unknown_orientation_is_identity() {
        let image = labelled(3, 2);
        for code in [0, 1, 9, 42, u16::MAX] {
            assert_eq!(Orientation::from_code(code), Orientation::TopLeft);
            assert_eq!(Orientation::from_code(code).apply(image.clone()), image);
        }
    }

    #[test]
    fn test_dimension_swap_flag() {
        for code in 1..=8u16 {
            let orientation = Orientation::from_code(code);
            assert_eq!(orientation.code(), code);
            let oriented = orientation.apply(labelled(4, 2));
            let expected = if orientation.swaps_dimensions() { (2, 4) } else { (4, 2) };
            assert_eq!((oriented.width(), oriented.height()), expected);
        }
    }
}
