//! Coordinates
//!
//! A 3D point in machine or calibration space. The default value is the
//! invalid sentinel (all components `+inf`), which the move matcher uses for
//! "axis not given" and the barycentric solver uses for "no solution".

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Sub};

use super::matrix::Mat3x3;

/// A point in 3D space with its squared distance to the origin cached.
///
/// Components are immutable once built. Negative zero is stored as positive
/// zero so that equality can be bitwise-exact without `-0 != 0` surprises.
#[derive(Debug, Clone, Copy)]
pub struct Coord {
    x: f64,
    y: f64,
    z: f64,
    norm2: f64,
}

/// The machine origin
pub const ORIGIN: Coord = Coord {
    x: 0.0,
    y: 0.0,
    z: 0.0,
    norm2: 0.0,
};

impl Coord {
    /// Invalid sentinel: every component is positive infinity
    pub const INVALID: Coord = Coord {
        x: f64::INFINITY,
        y: f64::INFINITY,
        z: f64::INFINITY,
        norm2: f64::INFINITY,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        // Adding +0.0 turns -0.0 into +0.0 and leaves everything else alone
        let (x, y, z) = (x + 0.0, y + 0.0, z + 0.0);
        Self {
            x,
            y,
            z,
            norm2: x * x + y * y + z * z,
        }
    }

    /// Build from a `[x, y, z]` array
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// Squared distance to the origin
    pub fn norm2(&self) -> f64 {
        self.norm2
    }

    /// True when no component is the sentinel (or otherwise non-finite)
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Squared Euclidean distance between two points
    pub fn distance2(&self, other: &Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Replace each component with the corresponding one from `overlay`,
    /// unless that component is the sentinel.
    pub fn overlay(&self, overlay: &Coord) -> Coord {
        let pick = |base: f64, over: f64| if over.is_finite() { over } else { base };
        Coord::new(
            pick(self.x, overlay.x),
            pick(self.y, overlay.y),
            pick(self.z, overlay.z),
        )
    }

    /// Zero out components whose magnitude is below `10^-places`.
    pub fn trunc(&self, places: i32) -> Coord {
        let threshold = 10f64.powi(-places);
        let cut = |v: f64| if v.abs() < threshold { 0.0 } else { v };
        Coord::new(cut(self.x), cut(self.y), cut(self.z))
    }

    /// Barycentric coordinates of `self` with respect to the tetrahedron
    /// `(c1, c2, c3, c4)`.
    ///
    /// The result holds the weights of `c1`, `c2` and `c3`; the weight of
    /// `c4` is `1 - x - y - z`. Returns [`Coord::INVALID`] when the
    /// tetrahedron is degenerate (its edge matrix is singular).
    pub fn barycentric(&self, c1: &Coord, c2: &Coord, c3: &Coord, c4: &Coord) -> Coord {
        let edges = Mat3x3::from_columns(*c1 - *c4, *c2 - *c4, *c3 - *c4);
        match edges.inverse() {
            Some(inv) => inv * (*self - *c4),
            None => Coord::INVALID,
        }
    }
}

impl Default for Coord {
    fn default() -> Self {
        Coord::INVALID
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<Coord> for f64 {
    type Output = Coord;

    fn mul(self, rhs: Coord) -> Coord {
        Coord::new(self * rhs.x, self * rhs.y, self * rhs.z)
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }
}

impl Eq for Coord {}

/// Table ordering only: squared norm first, then x, y, z.
/// This is not a physical ordering.
impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.norm2
            .total_cmp(&other.norm2)
            .then_with(|| self.x.total_cmp(&other.x))
            .then_with(|| self.y.total_cmp(&other.y))
            .then_with(|| self.z.total_cmp(&other.z))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}
