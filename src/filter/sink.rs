//! Terminal Sinks
//!
//! Collect lines in memory or write them to an output stream.

use std::io::Write;
use std::ops::Index;

use crate::error::FilterError;
use crate::filter::LineFilter;

/// Appends every line to a vector; used by tests
#[derive(Debug, Default, Clone)]
pub struct StringSink {
    lines: Vec<String>,
}

impl StringSink {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Index<usize> for StringSink {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.lines[index]
    }
}

impl LineFilter for StringSink {
    fn name(&self) -> &str {
        "StringSink"
    }

    fn write_line(&mut self, line: &str) -> Result<(), FilterError> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// Writes each line plus `\n` to an output stream; flushes when dropped
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> LineFilter for WriterSink<W> {
    fn name(&self) -> &str {
        "WriterSink"
    }

    fn write_line(&mut self, line: &str) -> Result<(), FilterError> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), FilterError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for WriterSink<W> {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            log::warn!("Failed to flush output: {}", e);
        }
    }
}
