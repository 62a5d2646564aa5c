//! The eight EXIF/TIFF orientations and the flips and quarter turns they
//! are composed of.

use tracing::debug;

use crate::image_pipeline::common::image::FloatImage;

/// Where row 0 and column 0 of the stored image sit when displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    TopLeft = 1,
    TopRight = 2,
    BottomRight = 3,
    BottomLeft = 4,
    LeftTop = 5,
    RightTop = 6,
    RightBottom = 7,
    LeftBottom = 8,
}

impl Orientation {
    /// Unknown codes, including 0, leave the image as stored.
    pub fn from_code(code: u16) -> Self {
        match code {
            2 => Orientation::TopRight,
            3 => Orientation::BottomRight,
            4 => Orientation::BottomLeft,
            5 => Orientation::LeftTop,
            6 => Orientation::RightTop,
            7 => Orientation::RightBottom,
            8 => Orientation::LeftBottom,
            1 => Orientation::TopLeft,
            other => {
                debug!("Ignoring orientation code {}", other);
                Orientation::TopLeft
            }
        }
    }

    pub fn code(self) -> u16 {
        self as u16
    }

    /// Whether width and height trade places.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::LeftTop
                | Orientation::RightTop
                | Orientation::RightBottom
                | Orientation::LeftBottom
        )
    }

    pub fn apply(self, image: FloatImage) -> FloatImage {
        match self {
            Orientation::TopLeft => image,
            Orientation::TopRight => flip_horizontal(&image),
            Orientation::BottomRight => flip_horizontal(&flip_vertical(&image)),
            Orientation::BottomLeft => flip_vertical(&image),
            Orientation::LeftTop => flip_vertical(&rotate_90_ccw(&image)),
            Orientation::RightTop => rotate_90_cw(&image),
            Orientation::RightBottom => flip_vertical(&rotate_90_cw(&image)),
            Orientation::LeftBottom => rotate_90_ccw(&image),
        }
    }
}

pub fn flip_horizontal(image: &FloatImage) -> FloatImage {
    let width = image.width();
    FloatImage::from_fn(width, image.height(), |x, y| image.get(width - 1 - x, y))
}

pub fn flip_vertical(image: &FloatImage) -> FloatImage {
    let height = image.height();
    FloatImage::from_fn(image.width(), height, |x, y| image.get(x, height - 1 - y))
}

/// Quarter turn clockwise; the bottom-left pixel becomes the top-left one.
pub fn rotate_90_cw(image: &FloatImage) -> FloatImage {
    let height = image.height();
    FloatImage::from_fn(height, image.width(), |x, y| image.get(y, height - 1 - x))
}

/// Quarter turn counter-clockwise; the top-right pixel becomes the top-left one.
pub fn rotate_90_ccw(image: &FloatImage) -> FloatImage {
    let width = image.width();
    FloatImage::from_fn(image.height(), width, |x, y| image.get(width - 1 - y, x))
}
