//! Crop and orientation of developed images

mod crop;
pub mod orientation;

#[cfg(test)]
mod tests;

pub use crop::{crop, crop_and_orient};
pub use orientation::{Orientation, flip_horizontal, flip_vertical, rotate_90_ccw, rotate_90_cw};
