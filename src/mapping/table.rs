//! Mapping Table
//!
//! Sparse calibration points keyed by their exact domain coordinate.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use crate::geometry::Coord;

/// Most neighbors ever returned; four points span a tetrahedron
pub const MAX_NEIGHBORS: usize = 4;

/// One calibration point: a domain coordinate and what it maps to.
///
/// Depending on the mapping mode `target` is either the corrected absolute
/// position or an offset to add to the domain coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedPoint {
    pub domain: Coord,
    pub target: Coord,
}

impl fmt::Display for MappedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.domain, self.target)
    }
}

/// Calibration points plus the default neighbor search radius.
///
/// Keys compare bitwise-exactly; only neighbor search uses distance.
/// Iteration follows [`Coord`]'s table ordering, which also decides
/// neighbor ties.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    points: BTreeMap<Coord, MappedPoint>,
    radius: f64,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a point, replacing any previous point with the same domain.
    ///
    /// While the radius is still unset (or the table is empty) it is derived
    /// from the new domain's distance to the origin.
    pub fn insert(&mut self, domain: Coord, target: Coord) {
        if self.radius == 0.0 || self.points.is_empty() {
            self.radius = domain.norm2().sqrt();
            log::info!("MappingTable radius:{}", self.radius);
        }

        self.points.insert(domain, MappedPoint { domain, target });
    }

    /// Default neighbor search radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Override the derived radius, e.g. with the calibration grid spacing.
    /// Negative values are clamped to zero.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(0.0);
        log::info!("MappingTable radius:{} (explicit)", self.radius);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, domain: &Coord) -> Option<&MappedPoint> {
        self.points.get(domain)
    }

    pub fn first(&self) -> Option<&MappedPoint> {
        self.points.values().next()
    }

    pub fn iter(&self) -> btree_map::Values<'_, Coord, MappedPoint> {
        self.points.values()
    }

    /// The (at most four) points closest to `query` that lie strictly within
    /// `radius`, nearest first.
    ///
    /// This is a full scan; calibration tables hold tens to hundreds of
    /// points. Equidistant points keep table order.
    pub fn neighborhood(&self, query: &Coord, radius: f64) -> Vec<MappedPoint> {
        let max_dist2 = radius * radius;
        let mut candidates: Vec<(f64, MappedPoint)> = self
            .points
            .values()
            .map(|point| (query.distance2(&point.domain), *point))
            .filter(|(dist2, _)| *dist2 < max_dist2)
            .collect();

        // Stable sort so ties stay in table order
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.truncate(MAX_NEIGHBORS);
        candidates.into_iter().map(|(_, point)| point).collect()
    }
}

impl<'a> IntoIterator for &'a MappingTable {
    type Item = &'a MappedPoint;
    type IntoIter = btree_map::Values<'a, Coord, MappedPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
