//! Filter Chain
//!
//! A filter accepts one line at a time and may forward the same or a
//! rewritten line to the stage it owns. Sinks terminate the chain.
//!
//! Chains are assembled once, starting from the sink:
//!
//! ```
//! use gcode_filter::filter::{DeltaFilter, LineFilter, StringSink};
//!
//! let mut chain = DeltaFilter::new(StringSink::new());
//! chain.write_line("G0").unwrap();
//! assert_eq!(&chain.next()[0], "G0X0Y0Z0");
//! ```

pub mod delta;
pub mod passthrough;
pub mod sink;

pub use delta::DeltaFilter;
pub use passthrough::PassThrough;
pub use sink::{StringSink, WriterSink};

use crate::error::FilterError;
use crate::geometry::Coord;
use crate::parser::MoveKind;

/// The single capability every stage provides
pub trait LineFilter {
    /// Stage name for logging
    fn name(&self) -> &str;

    /// Handle one line (without its terminator)
    fn write_line(&mut self, line: &str) -> Result<(), FilterError>;

    /// Push any buffered output through to the end of the chain
    fn flush(&mut self) -> Result<(), FilterError> {
        Ok(())
    }
}

impl<F: LineFilter + ?Sized> LineFilter for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn write_line(&mut self, line: &str) -> Result<(), FilterError> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> Result<(), FilterError> {
        (**self).flush()
    }
}

/// Render a coordinate value for emitted G-code.
///
/// Uses the shortest representation that round-trips, and never prints `-0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Rebuild a move line as `G<n>X<x>Y<y>Z<z>` followed by `trailing` verbatim.
pub fn format_move(kind: MoveKind, coord: &Coord, trailing: &str) -> String {
    format!(
        "{}X{}Y{}Z{}{}",
        kind.as_str(),
        format_number(coord.x()),
        format_number(coord.y()),
        format_number(coord.z()),
        trailing
    )
}
