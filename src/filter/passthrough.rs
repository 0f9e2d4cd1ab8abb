//! Pass-through Stage
//!
//! Forwards every line unchanged. Rewriting filters embed one of these and
//! hand it whichever line they decide to emit.

use crate::error::FilterError;
use crate::filter::LineFilter;

/// Forwards lines to the next stage untouched
#[derive(Debug, Default)]
pub struct PassThrough<N> {
    next: N,
}

impl<N: LineFilter> PassThrough<N> {
    pub fn new(next: N) -> Self {
        Self { next }
    }

    /// Downstream stage
    pub fn next(&self) -> &N {
        &self.next
    }

    /// Take the downstream stage back out of the chain
    pub fn into_next(self) -> N {
        self.next
    }
}

impl<N: LineFilter> LineFilter for PassThrough<N> {
    fn name(&self) -> &str {
        "PassThrough"
    }

    fn write_line(&mut self, line: &str) -> Result<(), FilterError> {
        self.next.write_line(line)
    }

    fn flush(&mut self) -> Result<(), FilterError> {
        self.next.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::StringSink;

    #[test]
    fn test_forwards_unchanged() {
        let mut filter = PassThrough::new(StringSink::new());
        filter.write_line("G1 X10 ; move").unwrap();
        filter.write_line("").unwrap();

        let sink = filter.into_next();
        assert_eq!(sink.lines(), ["G1 X10 ; move", ""]);
    }
}
