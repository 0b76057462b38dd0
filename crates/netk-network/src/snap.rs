//! Locating points on the network

use crate::{NetworkError, RoadNetwork};
use netk_domain::Point;

/// A position along a network edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkLocation {
    /// Edge index
    pub edge: usize,
    /// Travel distance from the edge's `from` node, in `[0, edge.length]`
    pub offset: f64,
    /// Straight-line distance the point moved to reach the edge
    pub snap_distance: f64,
}

impl RoadNetwork {
    /// Snap a point to the nearest edge within the snap tolerance
    ///
    /// `index` identifies the point in error messages.
    pub fn locate(&self, index: usize, point: &Point) -> Result<NetworkLocation, NetworkError> {
        self.locate_within(index, point, self.snap_tolerance)
    }

    /// Snap a point to the nearest edge no further than `tolerance` away
    pub fn locate_within(
        &self,
        index: usize,
        point: &Point,
        tolerance: f64,
    ) -> Result<NetworkLocation, NetworkError> {
        let mut best: Option<NetworkLocation> = None;

        for (edge_idx, edge) in self.edges.iter().enumerate() {
            let a = self.nodes[edge.from];
            let b = self.nodes[edge.to];
            let (t, distance) = project_onto_segment(point, &a, &b);

            if best.map_or(true, |loc| distance < loc.snap_distance) {
                best = Some(NetworkLocation {
                    edge: edge_idx,
                    offset: t * edge.length,
                    snap_distance: distance,
                });
            }
        }

        match best {
            Some(loc) if loc.snap_distance <= tolerance => Ok(loc),
            other => Err(NetworkError::Unsnappable {
                index,
                distance: other.map_or(f64::INFINITY, |loc| loc.snap_distance),
                tolerance,
            }),
        }
    }

    /// Snap every point, failing on the first that cannot be placed
    pub fn locate_all(&self, points: &[Point]) -> Result<Vec<NetworkLocation>, NetworkError> {
        self.locate_all_within(points, self.snap_tolerance)
    }

    /// Snap every point with an explicit tolerance
    pub fn locate_all_within(
        &self,
        points: &[Point],
        tolerance: f64,
    ) -> Result<Vec<NetworkLocation>, NetworkError> {
        check_tolerance(tolerance)?;
        points
            .iter()
            .enumerate()
            .map(|(idx, p)| self.locate_within(idx, p, tolerance))
            .collect()
    }
}

pub(crate) fn check_tolerance(tolerance: f64) -> Result<(), NetworkError> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(NetworkError::InvalidNetwork(format!(
            "snap tolerance must be finite and >= 0, got {}",
            tolerance
        )));
    }
    Ok(())
}

/// Project `p` onto segment `ab`; returns the segment parameter in `[0, 1]`
/// and the distance from `p` to the projected point
fn project_onto_segment(p: &Point, a: &Point, b: &Point) -> (f64, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };

    let projected = Point::new(a.x + t * dx, a.y + t * dy);
    (t, p.euclidean_distance(&projected))
}
