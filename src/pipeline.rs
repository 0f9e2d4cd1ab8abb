//! Filter Pipeline
//!
//! Assembles the configured stages into one chain and streams lines
//! through it, one at a time, in order.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use crate::config::Config;
use crate::error::{ConfigError, FilterError};
use crate::filter::{DeltaFilter, LineFilter, WriterSink};
use crate::mapping::{CalibrationDocument, MappingFilter};

/// A fully assembled filter chain
pub struct Pipeline {
    head: Box<dyn LineFilter>,
}

impl Pipeline {
    pub fn new(head: Box<dyn LineFilter>) -> Self {
        Self { head }
    }

    /// Build the chain described by `config`, ending in a sink that writes
    /// to `output`.
    ///
    /// Order: mapping stage, delta stage, sink. Calibration entries that are
    /// rejected are logged and the stage keeps the valid ones.
    pub fn from_config(config: &Config, output: Box<dyn Write>) -> Result<Self> {
        let mut head: Box<dyn LineFilter> = Box::new(WriterSink::new(output));

        if config.delta {
            head = Box::new(DeltaFilter::new(head));
        }

        match &config.calibration {
            Some(source) => {
                let doc = CalibrationDocument::from_path(&source.path).with_context(|| {
                    format!("failed to load calibration file {:?}", source.path)
                })?;
                let mode = source.mode.unwrap_or_else(|| doc.detect_mode());
                let (mut filter, result) = MappingFilter::with_document(head, mode, &doc);
                match result {
                    Ok(count) => log::info!("{} loaded {} points", filter.name(), count),
                    Err(e @ (ConfigError::InvalidEntries { .. } | ConfigError::NotAnArray { .. })) => {
                        log::error!("{:?}: {}", source.path, e);
                    }
                    Err(e) => return Err(e.into()),
                }
                if let Some(radius) = config.radius {
                    filter.set_radius(radius);
                }
                head = Box::new(filter);
            }
            None => {
                if config.radius.is_some() {
                    log::warn!("--radius ignored: no calibration file");
                }
            }
        }

        let pipeline = Self::new(head);
        log::info!("Pipeline head: {}", pipeline.name());
        Ok(pipeline)
    }

    /// Name of the first stage
    pub fn name(&self) -> &str {
        self.head.name()
    }

    pub fn write_line(&mut self, line: &str) -> Result<(), FilterError> {
        self.head.write_line(line)
    }

    pub fn flush(&mut self) -> Result<(), FilterError> {
        self.head.flush()
    }

    /// Feed every line from `reader` through the chain, then flush.
    /// Returns the number of lines processed.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut count = 0;
        for line in reader.lines() {
            let line = line.context("failed to read input line")?;
            let line = line.strip_suffix('\r').unwrap_or(&line);
            self.write_line(line)
                .with_context(|| format!("failed to process line {}", count + 1))?;
            count += 1;
        }
        self.flush().context("failed to flush output")?;
        log::info!("Processed {} lines", count);
        Ok(count)
    }
}

/// Run the filter described by `config` over its input and output
pub fn run(config: &Config) -> Result<usize> {
    let output: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    let mut pipeline = Pipeline::from_config(config, output)?;

    match &config.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open {:?}", path))?;
            pipeline.run(BufReader::new(file))
        }
        None => pipeline.run(io::stdin().lock()),
    }
}
