//! Mapping Filter
//!
//! Rewrites move commands so their coordinates are corrected through the
//! calibration table. Lines that are not moves pass through untouched.

use crate::error::{ConfigError, FilterError, RejectedEntry};
use crate::filter::{LineFilter, PassThrough, format_move};
use crate::geometry::{Coord, ORIGIN};
use crate::mapping::document::{CalibrationDocument, parse_entry};
use crate::mapping::interpolate::{self, MappingMode};
use crate::mapping::table::{MappedPoint, MappingTable};
use crate::parser::{MoveKind, MoveMatcher};

/// Correction stage: calibration table, running position and matcher
#[derive(Debug)]
pub struct MappingFilter<N> {
    base: PassThrough<N>,
    table: MappingTable,
    mode: MappingMode,
    matcher: MoveMatcher,
    position: Coord,
}

impl<N: LineFilter> MappingFilter<N> {
    pub fn new(next: N, mode: MappingMode) -> Self {
        Self {
            base: PassThrough::new(next),
            table: MappingTable::new(),
            mode,
            matcher: MoveMatcher::new(),
            position: ORIGIN,
        }
    }

    /// Filter whose points map to corrected absolute positions
    pub fn mapped_points(next: N) -> Self {
        Self::new(next, MappingMode::Absolute)
    }

    /// Filter whose points carry offsets to add
    pub fn point_offsets(next: N) -> Self {
        Self::new(next, MappingMode::Offset)
    }

    /// Build a filter and load `doc` into it.
    ///
    /// On a configuration error the filter is returned alongside it, holding
    /// every entry that was accepted.
    pub fn with_document(
        next: N,
        mode: MappingMode,
        doc: &CalibrationDocument,
    ) -> (Self, Result<usize, ConfigError>) {
        let mut filter = Self::new(next, mode);
        let result = filter.configure(doc);
        (filter, result)
    }

    /// Load calibration points from a document.
    ///
    /// Bad entries are logged and skipped; the rest are applied. Returns the
    /// number of accepted entries, or [`ConfigError::InvalidEntries`] if any
    /// were rejected. A mapping key that is not an array is rejected whole.
    pub fn configure(&mut self, doc: &CalibrationDocument) -> Result<usize, ConfigError> {
        let key = self.mode.key();
        log::info!("{}::configure() key:{}", self.name(), key);

        let other = match self.mode {
            MappingMode::Absolute => MappingMode::Offset,
            MappingMode::Offset => MappingMode::Absolute,
        };
        if doc.entries(other).is_some() {
            log::warn!(
                "{}::configure() ignoring \"{}\" entries",
                self.name(),
                other.key()
            );
        }

        let mut accepted = 0;
        let mut rejected = Vec::new();
        if let Some(entries) = doc.entries(self.mode) {
            let entries = entries.as_array().ok_or_else(|| {
                log::error!("{}::configure() expected array for \"{}\"", self.name(), key);
                ConfigError::NotAnArray {
                    key: key.to_string(),
                }
            })?;

            for (index, entry) in entries.iter().enumerate() {
                match parse_entry(entry, self.mode) {
                    Ok((domain, target)) => {
                        log::debug!(
                            "{}::configure() domain:{} target:{}",
                            self.name(),
                            domain,
                            target
                        );
                        self.map_point(domain, target);
                        accepted += 1;
                    }
                    Err(error) => {
                        log::error!("{}::configure() entry {}: {}", self.name(), index, error);
                        rejected.push(RejectedEntry { index, error });
                    }
                }
            }
        }

        if let Some(radius) = doc.radius {
            self.set_radius(radius);
        }

        log::info!(
            "{}::configure() accepted:{} rejected:{}",
            self.name(),
            accepted,
            rejected.len()
        );
        if !matches!(self.table.len(), 0 | 1) && self.table.len() < 4 {
            log::warn!(
                "{}::configure() {} points configured; 1 or at least 4 are required",
                self.name(),
                self.table.len()
            );
        }

        if rejected.is_empty() {
            Ok(accepted)
        } else {
            Err(ConfigError::InvalidEntries { rejected, accepted })
        }
    }

    /// Insert or replace the calibration point at `domain`
    pub fn map_point(&mut self, domain: Coord, target: Coord) {
        self.table.insert(domain, target);
    }

    /// Best estimate for `query`; see [`interpolate::resolve`]
    pub fn resolve(&self, query: &Coord) -> Result<Coord, FilterError> {
        interpolate::resolve(&self.table, self.mode, query)
    }

    /// Closest points to `query` within `radius`, nearest first (at most 4)
    pub fn neighborhood(&self, query: &Coord, radius: f64) -> Vec<MappedPoint> {
        self.table.neighborhood(query, radius)
    }

    pub fn radius(&self) -> f64 {
        self.table.radius()
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.table.set_radius(radius);
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    pub fn mode(&self) -> MappingMode {
        self.mode
    }

    /// Last resolved (uncorrected) position
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

impl<N: LineFilter> LineFilter for MappingFilter<N> {
    fn name(&self) -> &str {
        match self.mode {
            MappingMode::Absolute => "MappedPointFilter",
            MappingMode::Offset => "PointOffsetFilter",
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), FilterError> {
        let consumed = self.matcher.match_line(line);
        let Some(kind) = self.matcher.kind() else {
            log::trace!("{}::write_line({}) (no change)", self.name(), line);
            return self.base.write_line(line);
        };

        let position = self.position.overlay(&self.matcher.coord());
        // Homing re-zeroes the machine; it is never mapped
        let resolved = match kind {
            MoveKind::Home => Ok(ORIGIN),
            MoveKind::Rapid | MoveKind::Linear => self.resolve(&position),
        };
        let corrected = match resolved {
            Ok(corrected) => corrected,
            Err(FilterError::UnsupportedMapping { points }) => {
                log::error!(
                    "{}::write_line({}) {}-point mapping is undefined (line not corrected)",
                    self.name(),
                    line,
                    points
                );
                self.base.write_line(line)?;
                self.position = position;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        self.base
            .write_line(&format_move(kind, &corrected, &line[consumed..]))?;
        self.position = position;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), FilterError> {
        self.base.flush()
    }
}
