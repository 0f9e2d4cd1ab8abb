//! Coordinate Mapping
//!
//! Calibration table, interpolation policy and the filter stage that
//! applies them to move commands.

pub mod document;
pub mod filter;
pub mod interpolate;
pub mod table;

pub use document::CalibrationDocument;
pub use filter::MappingFilter;
pub use interpolate::{MappingMode, resolve};
pub use table::{MappedPoint, MappingTable};
