//! sRGB transfer curve (IEC 61966-2-1), applied per channel.

#[inline]
pub fn srgb_to_linear(encoded: f32) -> f32 {
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.003_130_8 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Converts the colour channels of an RGBA pixel, leaving alpha alone.
#[inline]
pub fn srgb_to_linear_rgba(pixel: [f32; 4]) -> [f32; 4] {
    [
        srgb_to_linear(pixel[0]),
        srgb_to_linear(pixel[1]),
        srgb_to_linear(pixel[2]),
        pixel[3],
    ]
}

#[inline]
pub fn linear_to_srgb_rgba(pixel: [f32; 4]) -> [f32; 4] {
    [
        linear_to_srgb(pixel[0]),
        linear_to_srgb(pixel[1]),
        linear_to_srgb(pixel[2]),
        pixel[3],
    ]
}
