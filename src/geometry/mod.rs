//! Geometry Primitives
//!
//! Coordinate value type and the 3x3 matrix used for barycentric weights.

pub mod coord;
pub mod matrix;

pub use coord::{Coord, ORIGIN};
pub use matrix::Mat3x3;
