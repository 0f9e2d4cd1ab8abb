//! 3x3 Matrix
//!
//! Just enough linear algebra to solve for barycentric weights, on top of
//! `nalgebra::Matrix3`.

use std::fmt;
use std::ops::Mul;

use nalgebra::{Matrix3, Vector3};

use super::coord::Coord;

/// Determinants with a smaller magnitude are treated as singular
pub const SINGULAR_TOLERANCE: f64 = 1e-2;

/// Rows (or columns) left over when one index is removed
const REMAINING: [[usize; 2]; 3] = [[1, 2], [0, 2], [0, 1]];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3x3 {
    inner: Matrix3<f64>,
}

impl Mat3x3 {
    /// Build from nine values in row-major order
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        a00: f64,
        a01: f64,
        a02: f64,
        a10: f64,
        a11: f64,
        a12: f64,
        a20: f64,
        a21: f64,
        a22: f64,
    ) -> Self {
        Self {
            inner: Matrix3::new(a00, a01, a02, a10, a11, a12, a20, a21, a22),
        }
    }

    /// Build a matrix whose columns are the given vectors
    pub fn from_columns(c0: Coord, c1: Coord, c2: Coord) -> Self {
        Self {
            inner: Matrix3::from_columns(&[to_vector(c0), to_vector(c1), to_vector(c2)]),
        }
    }

    /// Element at `row`, `col`
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.inner[(row, col)]
    }

    /// Determinant of the 2x2 minor left after removing `row` and `col`
    pub fn det2x2(&self, row: usize, col: usize) -> f64 {
        let [r0, r1] = REMAINING[row];
        let [c0, c1] = REMAINING[col];
        let m = &self.inner;
        m[(r0, c0)] * m[(r1, c1)] - m[(r0, c1)] * m[(r1, c0)]
    }

    pub fn det3x3(&self) -> f64 {
        self.inner.determinant()
    }

    /// Inverse, or `None` if the matrix is (nearly) singular.
    pub fn inverse(&self) -> Option<Mat3x3> {
        if self.det3x3().abs() < SINGULAR_TOLERANCE {
            return None;
        }
        self.inner.try_inverse().map(|inner| Mat3x3 { inner })
    }
}

impl Default for Mat3x3 {
    fn default() -> Self {
        Self {
            inner: Matrix3::zeros(),
        }
    }
}

fn to_vector(c: Coord) -> Vector3<f64> {
    Vector3::new(c.x(), c.y(), c.z())
}

impl Mul<Coord> for Mat3x3 {
    type Output = Coord;

    fn mul(self, v: Coord) -> Coord {
        let product = self.inner * to_vector(v);
        Coord::new(product.x, product.y, product.z)
    }
}

impl fmt::Display for Mat3x3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.inner.row_iter() {
            writeln!(f, "[  {}  {}  {}  ]", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}
