//! GCode Filter
//!
//! A streaming, line-oriented filter pipeline that corrects the coordinates
//! of G-code move commands before they reach a motion controller.
//!
//! This library provides:
//! - Coordinate and matrix primitives
//! - Move command matching
//! - Filter chain stages and sinks
//! - Calibration tables with barycentric interpolation
//! - Configuration and pipeline assembly

pub mod config;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod mapping;
pub mod parser;
pub mod pipeline;

// Re-exports for clean public API
pub use config::Config;
pub use error::{ConfigError, FilterError};
pub use filter::{LineFilter, StringSink, WriterSink};
pub use geometry::{Coord, Mat3x3, ORIGIN};
pub use mapping::{CalibrationDocument, MappingFilter, MappingMode, MappingTable};
pub use parser::{MoveMatcher, match_number};
pub use pipeline::Pipeline;
