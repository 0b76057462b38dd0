//! Trait definitions for external collaborators
//!
//! The K-function core never measures a network or routes between points
//! itself. These traits are the boundary; the in-memory implementation lives in
//! `netk-network`, and tests substitute their own.

use crate::{NetworkLength, PairwiseDistanceSet, Point};

/// Supplies the total length of the network
pub trait NetworkLengthProvider {
    /// Error type for length calculation
    type Error;

    /// Total network length in projected linear units
    fn network_length(&self) -> Result<NetworkLength, Self::Error>;
}

/// Computes shortest network distances between every pair of points
///
/// Points further than `snap_tolerance` from the network cannot be located
/// and are an error; pairs without a path come back as unreachable.
pub trait DistanceProvider {
    /// Error type for distance computation
    type Error;

    /// Pairwise distances over `points`, indexed by position in the slice
    fn pairwise_distances(
        &self,
        points: &[Point],
        snap_tolerance: f64,
    ) -> Result<PairwiseDistanceSet, Self::Error>;
}

/// Places points uniformly at random along the network
///
/// Placement is uniform over network length (edges weighted by length), not
/// over edge count. The same `seed` must yield the same points.
pub trait RandomPointGenerator {
    /// Error type for point generation
    type Error;

    /// Generate `count` random points
    fn random_points(&self, count: usize, seed: u64) -> Result<Vec<Point>, Self::Error>;
}
