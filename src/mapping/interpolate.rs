//! Interpolation
//!
//! Best-estimate correction for a query coordinate from the calibration
//! table: barycentric interpolation over the four nearest points, falling
//! back to inverse-distance weighting when fewer points are in range or
//! the nearest four are coplanar.

use crate::error::FilterError;
use crate::geometry::Coord;
use crate::mapping::table::{MappedPoint, MappingTable};

/// Points closer than this are weighted as if they were this far away
pub const WEIGHTING_DISTANCE: f64 = 0.001;

/// Decimal places kept in barycentric results before zeroing noise
pub const TRUNCATE_PLACES: i32 = 5;

/// What a calibration point's target means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingMode {
    /// Target is the corrected absolute position (`"map"` documents)
    Absolute,
    /// Target is an offset added to the query (`"offsets"` documents)
    Offset,
}

impl MappingMode {
    /// Document key holding this mode's entries
    pub fn key(&self) -> &'static str {
        match self {
            MappingMode::Absolute => "map",
            MappingMode::Offset => "offsets",
        }
    }

    /// Entry field names for the domain and target vectors
    pub fn fields(&self) -> (&'static str, &'static str) {
        match self {
            MappingMode::Absolute => ("domain", "range"),
            MappingMode::Offset => ("point", "offset"),
        }
    }
}

/// Resolve `query` against `table`.
///
/// - empty table: `query` unchanged
/// - one point: uniform translation everywhere
/// - two or three points: [`FilterError::UnsupportedMapping`]
/// - otherwise: interpolate within the table radius; no neighbors means no
///   correction
pub fn resolve(table: &MappingTable, mode: MappingMode, query: &Coord) -> Result<Coord, FilterError> {
    match table.len() {
        0 => {
            log::trace!("no interpolation mapping");
            return Ok(*query);
        }
        1 => {
            if let Some(point) = table.first() {
                return Ok(match mode {
                    MappingMode::Absolute => *query + point.target - point.domain,
                    MappingMode::Offset => *query + point.target,
                });
            }
        }
        points @ (2 | 3) => {
            return Err(FilterError::UnsupportedMapping { points });
        }
        _ => {}
    }

    let neighborhood = table.neighborhood(query, table.radius());
    log::debug!(
        "interpolate({}) neighborhood:{}",
        query,
        neighborhood.len()
    );
    if log::log_enabled!(log::Level::Trace) {
        for (i, point) in neighborhood.iter().enumerate() {
            log::trace!(
                "neighborhood[{}]: {} {}",
                i,
                point,
                query.distance2(&point.domain)
            );
        }
    }

    if neighborhood.is_empty() {
        return Ok(*query);
    }

    let estimate = barycentric_estimate(query, &neighborhood)
        .unwrap_or_else(|| inverse_distance_estimate(query, &neighborhood));

    Ok(match mode {
        MappingMode::Absolute => estimate,
        MappingMode::Offset => *query + estimate,
    })
}

/// Interpolate targets over the tetrahedron spanned by the first four
/// neighbors. `None` if there are fewer than four or they are coplanar.
pub fn barycentric_estimate(query: &Coord, neighborhood: &[MappedPoint]) -> Option<Coord> {
    let [p1, p2, p3, p4] = neighborhood.get(..4)? else {
        return None;
    };

    let bc = query.barycentric(&p1.domain, &p2.domain, &p3.domain, &p4.domain);
    if !bc.is_valid() {
        log::debug!("degenerate tetrahedron");
        return None;
    }

    let bc4 = 1.0 - (bc.x() + bc.y() + bc.z());
    let estimate = (bc.x() * p1.target
        + bc.y() * p2.target
        + bc.z() * p3.target
        + bc4 * p4.target)
        .trunc(TRUNCATE_PLACES);
    log::trace!("barycentric({},{},{},{})", bc.x(), bc.y(), bc.z(), bc4);
    log::trace!("barycentric => {}", estimate);
    Some(estimate)
}

/// Weighted average of neighbor targets with weights `1/distance`.
///
/// Distances below [`WEIGHTING_DISTANCE`] are clamped so coincident points
/// do not blow up. Uses at most the first four neighbors.
pub fn inverse_distance_estimate(query: &Coord, neighborhood: &[MappedPoint]) -> Coord {
    let neighbors = &neighborhood[..neighborhood.len().min(4)];
    let weights: Vec<f64> = neighbors
        .iter()
        .map(|point| {
            let dist2 = query
                .distance2(&point.domain)
                .max(WEIGHTING_DISTANCE * WEIGHTING_DISTANCE);
            1.0 / dist2.sqrt()
        })
        .collect();
    let total: f64 = weights.iter().sum();

    let mut estimate = Coord::new(0.0, 0.0, 0.0);
    if total != 0.0 {
        for (weight, point) in weights.iter().zip(neighbors) {
            estimate = estimate + (weight / total) * point.target;
        }
    }
    log::trace!("weighted => {}", estimate);
    estimate
}
