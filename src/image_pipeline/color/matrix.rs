use std::ops::Mul;

use nalgebra::Matrix3;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Linear map between two 3-component colour spaces, stored row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix3x3 {
    rows: [[f32; 3]; 3],
}

// Taken from http://www.brucelindbloom.com/index.html?Eqn_ChromAdapt.html
pub const XYZ_D65_TO_SRGB: ColorMatrix3x3 = ColorMatrix3x3::from_rows([
    [3.2406, -1.5372, -0.4986],
    [-0.9689, 1.8758, 0.0415],
    [0.0557, -0.2040, 1.0570],
]);

pub const XYZ_D50_TO_XYZ_D65: ColorMatrix3x3 = ColorMatrix3x3::from_rows([
    [0.9555766, -0.0230393, 0.0631636],
    [-0.0282895, 1.0099416, 0.0210077],
    [0.0122982, -0.0204830, 1.3299098],
]);

// Taken from http://www.brucelindbloom.com/index.html?Eqn_RGB_XYZ_Matrix.html
pub const XYZ_D50_TO_SRGB: ColorMatrix3x3 = ColorMatrix3x3::from_rows([
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
]);

impl ColorMatrix3x3 {
    pub const IDENTITY: ColorMatrix3x3 =
        ColorMatrix3x3::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { rows }
    }

    pub fn from_diagonal(diagonal: [f32; 3]) -> Self {
        let [a, b, c] = diagonal;
        Self::from_rows([[a, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, c]])
    }

    fn to_nalgebra(self) -> Matrix3<f32> {
        let r = self.rows;
        Matrix3::new(
            r[0][0], r[0][1], r[0][2],
            r[1][0], r[1][1], r[1][2],
            r[2][0], r[2][1], r[2][2],
        )
    }

    fn from_nalgebra(m: &Matrix3<f32>) -> Self {
        Self::from_rows([
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ])
    }

    pub fn determinant(&self) -> f32 {
        self.to_nalgebra().determinant()
    }

    /// Inverts the matrix; `name` identifies it in the error when it is singular.
    pub fn try_inverse(&self, name: &'static str) -> Result<Self> {
        let inverse = self
            .to_nalgebra()
            .try_inverse()
            .ok_or(ConversionError::SingularMatrix(name))?;
        if inverse.iter().any(|v| !v.is_finite()) {
            return Err(ConversionError::SingularMatrix(name));
        }
        Ok(Self::from_nalgebra(&inverse))
    }

    #[inline]
    pub fn transform(&self, v: [f32; 3]) -> [f32; 3] {
        let r = &self.rows;
        [
            r[0][0] * v[0] + r[0][1] * v[1] + r[0][2] * v[2],
            r[1][0] * v[0] + r[1][1] * v[1] + r[1][2] * v[2],
            r[2][0] * v[0] + r[2][1] * v[1] + r[2][2] * v[2],
        ]
    }

    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl Default for ColorMatrix3x3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for ColorMatrix3x3 {
    type Output = ColorMatrix3x3;

    fn mul(self, rhs: ColorMatrix3x3) -> ColorMatrix3x3 {
        Self::from_nalgebra(&(self.to_nalgebra() * rhs.to_nalgebra()))
    }
}
