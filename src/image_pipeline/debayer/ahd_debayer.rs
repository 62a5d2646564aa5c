//! Adaptive homogeneity-directed (AHD) demosaicing.
//!
//! Green is interpolated twice, once along rows and once along columns.
//! Red and blue are then filled in from colour differences against each
//! green estimate, giving two complete candidate images. Both candidates are
//! converted to CIELAB and, per pixel, the direction whose 3x3 neighbourhood
//! is more homogeneous (small luminance and chrominance steps) wins; ties
//! average the two.
//!
//! Neighbours outside the image are mirrored about the border photosite,
//! which keeps the CFA parity of the mirrored sample.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::image_pipeline::color::ColorMatrix3x3;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::common::image::FloatImage;
use crate::image_pipeline::common::timing::PipelineTimings;
use crate::image_pipeline::debayer::types::{CfaColor, Mosaic, RedOffset};

const HORIZONTAL: usize = 0;
const VERTICAL: usize = 1;

/// (dx, dy) unit step of each interpolation direction.
const STEPS: [(isize, isize); 2] = [(1, 0), (0, 1)];

/// Left, right, up, down.
const NEIGHBOURS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const D65_WHITE: [f32; 3] = [0.95047, 1.0, 1.08883];
const LAB_EPSILON: f32 = 216.0 / 24389.0;
const LAB_KAPPA: f32 = 24389.0 / 27.0;

pub struct AhdDebayer {
    camera_to_xyz: ColorMatrix3x3,
}

impl AhdDebayer {
    /// `camera_to_xyz` maps mosaic values to XYZ (D65) for the homogeneity metric.
    pub fn new(camera_to_xyz: ColorMatrix3x3) -> Self {
        Self { camera_to_xyz }
    }

    pub fn process(&self, mosaic: &Mosaic, red: RedOffset) -> Result<FloatImage> {
        let (width, height) = (mosaic.width, mosaic.height);
        if width == 0 || height == 0 {
            return Err(ConversionError::InvalidDimensions(width, height));
        }
        if mosaic.data.len() != width * height {
            return Err(ConversionError::MalformedInput(format!(
                "mosaic of {}x{} holds {} samples",
                width,
                height,
                mosaic.data.len()
            )));
        }
        info!("Starting AHD debayering for image {}x{}", width, height);
        let mut timings = PipelineTimings::new();

        let samples = Plane::new(&mosaic.data, width, height);

        let greens = timings.measure("ahd green", || {
            [HORIZONTAL, VERTICAL].map(|d| interpolate_green(&samples, red, STEPS[d]))
        });

        let candidates = timings.measure("ahd red/blue", || {
            [HORIZONTAL, VERTICAL]
                .map(|d| fill_red_blue(&samples, red, &Plane::new(&greens[d], width, height)))
        });

        let lab = timings.measure("ahd lab", || {
            [HORIZONTAL, VERTICAL].map(|d| to_lab(&candidates[d], &self.camera_to_xyz))
        });

        let homogeneity = timings.measure("ahd homogeneity", || {
            homogeneity_map(
                &Plane::new(&lab[HORIZONTAL], width, height),
                &Plane::new(&lab[VERTICAL], width, height),
            )
        });

        let image = timings.measure("ahd select", || {
            select_direction(&candidates, &Plane::new(&homogeneity, width, height))
        });

        debug!(
            "AHD debayering took {:.3} seconds",
            timings.total_duration().as_secs_f64()
        );
        Ok(image)
    }
}

/// Read-only view of a row-major plane with mirrored out-of-bounds access.
pub(super) struct Plane<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
}

impl<'a, T: Copy> Plane<'a, T> {
    pub(super) fn new(data: &'a [T], width: usize, height: usize) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    #[inline]
    fn at(&self, x: isize, y: isize) -> T {
        self.data[mirror(y, self.height) * self.width + mirror(x, self.width)]
    }
}

/// Reflects `i` about the first and last index of `0..n`.
#[inline]
pub(super) fn mirror(i: isize, n: usize) -> usize {
    let last = n as isize - 1;
    let mut i = i.abs();
    if i > last {
        i = 2 * last - i;
    }
    // images narrower than the reflection reach fall back to clamping
    i.clamp(0, last) as usize
}

fn par_map<T, F>(width: usize, height: usize, f: F) -> Vec<T>
where
    T: Copy + Default + Send,
    F: Fn(usize, usize) -> T + Sync,
{
    let mut out = vec![T::default(); width * height];
    out.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, value) in row.iter_mut().enumerate() {
                *value = f(x, y);
            }
        });
    out
}

/// Green at every photosite, interpolated along `(dx, dy)` at red and blue sites.
fn interpolate_green(samples: &Plane<f32>, red: RedOffset, (dx, dy): (isize, isize)) -> Vec<f32> {
    par_map(samples.width, samples.height, |x, y| {
        let (xi, yi) = (x as isize, y as isize);
        let centre = samples.at(xi, yi);
        if red.color_at(x, y) == CfaColor::Green {
            return centre;
        }

        let g_prev = samples.at(xi - dx, yi - dy);
        let g_next = samples.at(xi + dx, yi + dy);
        let c_prev = samples.at(xi - 2 * dx, yi - 2 * dy);
        let c_next = samples.at(xi + 2 * dx, yi + 2 * dy);

        // green average corrected by the Laplacian of the centre channel,
        // limited to the range of the two greens it sits between
        let estimate = (g_prev + g_next) * 0.5 + (2.0 * centre - c_prev - c_next) * 0.25;
        estimate.max(g_prev.min(g_next)).min(g_prev.max(g_next))
    })
}

/// Completes red and blue from colour differences against one green estimate.
fn fill_red_blue(samples: &Plane<f32>, red: RedOffset, green: &Plane<f32>) -> Vec<[f32; 3]> {
    let diff = |x: isize, y: isize| samples.at(x, y) - green.at(x, y);

    par_map(samples.width, samples.height, |x, y| {
        let (xi, yi) = (x as isize, y as isize);
        let g = green.at(xi, yi);
        let value = samples.at(xi, yi);

        match red.color_at(x, y) {
            CfaColor::Green => {
                let along_row = g + (diff(xi - 1, yi) + diff(xi + 1, yi)) * 0.5;
                let along_column = g + (diff(xi, yi - 1) + diff(xi, yi + 1)) * 0.5;
                if red.is_red_row(y) {
                    [along_row, g, along_column]
                } else {
                    [along_column, g, along_row]
                }
            }
            CfaColor::Red => [value, g, g + diagonal_mean(&diff, xi, yi)],
            CfaColor::Blue => [g + diagonal_mean(&diff, xi, yi), g, value],
        }
    })
}

#[inline]
fn diagonal_mean(diff: &impl Fn(isize, isize) -> f32, x: isize, y: isize) -> f32 {
    (diff(x - 1, y - 1) + diff(x + 1, y - 1) + diff(x - 1, y + 1) + diff(x + 1, y + 1)) * 0.25
}

fn to_lab(rgb: &[[f32; 3]], camera_to_xyz: &ColorMatrix3x3) -> Vec<[f32; 3]> {
    rgb.par_iter()
        .map(|&p| lab_from_xyz(camera_to_xyz.transform(p)))
        .collect()
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

#[inline]
fn lab_from_xyz(xyz: [f32; 3]) -> [f32; 3] {
    let fx = lab_f(xyz[0] / D65_WHITE[0]);
    let fy = lab_f(xyz[1] / D65_WHITE[1]);
    let fz = lab_f(xyz[2] / D65_WHITE[2]);
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// Number of the four neighbours within the luminance and chrominance
/// tolerances, for each direction.
fn homogeneity_map(horizontal: &Plane<[f32; 3]>, vertical: &Plane<[f32; 3]>) -> Vec<[u8; 2]> {
    let planes = [horizontal, vertical];

    par_map(horizontal.width, horizontal.height, |x, y| {
        let (xi, yi) = (x as isize, y as isize);
        let mut l_diff = [[0.0f32; 4]; 2];
        let mut ab_diff = [[0.0f32; 4]; 2];

        for d in [HORIZONTAL, VERTICAL] {
            let centre = planes[d].at(xi, yi);
            for (i, (dx, dy)) in NEIGHBOURS.iter().enumerate() {
                let n = planes[d].at(xi + dx, yi + dy);
                l_diff[d][i] = (centre[0] - n[0]).abs();
                ab_diff[d][i] = (centre[1] - n[1]).powi(2) + (centre[2] - n[2]).powi(2);
            }
        }

        // tolerances: the smaller of the worst step each direction takes along itself
        let l_eps = l_diff[HORIZONTAL][0]
            .max(l_diff[HORIZONTAL][1])
            .min(l_diff[VERTICAL][2].max(l_diff[VERTICAL][3]));
        let ab_eps = ab_diff[HORIZONTAL][0]
            .max(ab_diff[HORIZONTAL][1])
            .min(ab_diff[VERTICAL][2].max(ab_diff[VERTICAL][3]));

        let mut homogeneity = [0u8; 2];
        for d in [HORIZONTAL, VERTICAL] {
            homogeneity[d] = (0..NEIGHBOURS.len())
                .filter(|&i| l_diff[d][i] <= l_eps && ab_diff[d][i] <= ab_eps)
                .count() as u8;
        }
        homogeneity
    })
}

pub(super) fn select_direction(candidates: &[Vec<[f32; 3]>; 2], homogeneity: &Plane<[u8; 2]>) -> FloatImage {
    let width = homogeneity.width;

    FloatImage::from_fn(width, homogeneity.height, |x, y| {
        let (xi, yi) = (x as isize, y as isize);
        let mut score = [0u32; 2];
        for ny in -1..=1 {
            for nx in -1..=1 {
                let h = homogeneity.at(xi + nx, yi + ny);
                score[HORIZONTAL] += h[HORIZONTAL] as u32;
                score[VERTICAL] += h[VERTICAL] as u32;
            }
        }

        let index = y * width + x;
        let h = candidates[HORIZONTAL][index];
        let v = candidates[VERTICAL][index];
        let rgb = match score[HORIZONTAL].cmp(&score[VERTICAL]) {
            Ordering::Greater => h,
            Ordering::Less => v,
            Ordering::Equal => [
                (h[0] + v[0]) * 0.5,
                (h[1] + v[1]) * 0.5,
                (h[2] + v[2]) * 0.5,
            ],
        };
        [rgb[0], rgb[1], rgb[2], 1.0]
    })
}
