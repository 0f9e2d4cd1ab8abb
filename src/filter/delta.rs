//! Delta Stage
//!
//! Delta mechanisms move all three towers for any axis change, so the
//! controller wants every move fully qualified. This stage tracks the
//! absolute position and rewrites each move with explicit X, Y and Z.

use crate::error::FilterError;
use crate::filter::{LineFilter, PassThrough, format_move};
use crate::geometry::{Coord, ORIGIN};
use crate::parser::{MoveKind, MoveMatcher};

/// Expands moves to explicit absolute X/Y/Z; other lines pass through
#[derive(Debug)]
pub struct DeltaFilter<N> {
    base: PassThrough<N>,
    matcher: MoveMatcher,
    position: Coord,
}

impl<N: LineFilter> DeltaFilter<N> {
    pub fn new(next: N) -> Self {
        Self {
            base: PassThrough::new(next),
            matcher: MoveMatcher::new(),
            position: ORIGIN,
        }
    }

    /// Last position emitted downstream
    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn next(&self) -> &N {
        self.base.next()
    }

    pub fn into_next(self) -> N {
        self.base.into_next()
    }
}

impl<N: LineFilter> LineFilter for DeltaFilter<N> {
    fn name(&self) -> &str {
        "DeltaFilter"
    }

    fn write_line(&mut self, line: &str) -> Result<(), FilterError> {
        let consumed = self.matcher.match_line(line);
        let Some(kind) = self.matcher.kind() else {
            log::trace!("DeltaFilter::write_line({}) (no change)", line);
            return self.base.write_line(line);
        };

        let target = match kind {
            MoveKind::Home => ORIGIN,
            MoveKind::Rapid | MoveKind::Linear => self.position.overlay(&self.matcher.coord()),
        };
        self.base
            .write_line(&format_move(kind, &target, &line[consumed..]))?;
        self.position = target;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), FilterError> {
        self.base.flush()
    }
}
