//! Shortest-path distances between located points
//!
//! Each origin runs one Dijkstra search seeded from both ends of its edge, so
//! a search answers every destination at once. Origins are independent and run
//! in parallel.

use crate::snap::NetworkLocation;
use crate::{NetworkError, RoadNetwork};
use netk_domain::{NetworkDistance, PairwiseDistanceSet, Point};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

/// Heap entry ordered so that `BinaryHeap` pops the smallest cost first
#[derive(Debug, Clone, Copy)]
struct Visit {
    cost: f64,
    node: usize,
}

impl PartialEq for Visit {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal && self.node == other.node
    }
}

impl Eq for Visit {}

impl Ord for Visit {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for Visit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl RoadNetwork {
    /// Node distances from a location, infinite where no path exists
    fn node_distances_from(&self, origin: &NetworkLocation) -> Vec<f64> {
        let edge = self.edges[origin.edge];
        let mut dist = vec![f64::INFINITY; self.nodes.len()];
        let mut heap = BinaryHeap::new();

        for (node, cost) in [(edge.from, origin.offset), (edge.to, edge.length - origin.offset)] {
            if cost < dist[node] {
                dist[node] = cost;
                heap.push(Visit { cost, node });
            }
        }

        while let Some(Visit { cost, node }) = heap.pop() {
            if cost > dist[node] {
                continue;
            }
            for &(next, length) in &self.adjacency[node] {
                let candidate = cost + length;
                if candidate < dist[next] {
                    dist[next] = candidate;
                    heap.push(Visit { cost: candidate, node: next });
                }
            }
        }

        dist
    }

    /// Network distance between two located points given the origin's node distances
    fn distance_to(
        &self,
        origin: &NetworkLocation,
        origin_dist: &[f64],
        target: &NetworkLocation,
    ) -> NetworkDistance {
        let edge = self.edges[target.edge];
        let mut best = (origin_dist[edge.from] + target.offset)
            .min(origin_dist[edge.to] + (edge.length - target.offset));

        if origin.edge == target.edge {
            best = best.min((origin.offset - target.offset).abs());
        }

        if best.is_finite() {
            NetworkDistance::Reachable(best)
        } else {
            NetworkDistance::Unreachable
        }
    }

    /// Pairwise distances between already-located points
    pub fn distances_between(
        &self,
        locations: &[NetworkLocation],
    ) -> Result<PairwiseDistanceSet, NetworkError> {
        let start = Instant::now();

        let entries: Vec<(usize, usize, NetworkDistance)> = locations
            .par_iter()
            .enumerate()
            .flat_map_iter(|(i, origin)| {
                let origin_dist = self.node_distances_from(origin);
                locations[i + 1..]
                    .iter()
                    .enumerate()
                    .map(move |(k, target)| {
                        let j = i + 1 + k;
                        (i, j, self.distance_to(origin, &origin_dist, target))
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let set = PairwiseDistanceSet::from_entries(locations.len(), entries)?;

        tracing::debug!(
            "Routed {} points: {} reachable pairs, {} unreachable ({:?})",
            locations.len(),
            set.reachable_pairs(),
            set.unreachable_pairs(),
            start.elapsed()
        );

        Ok(set)
    }

    /// Snap points and compute their pairwise network distances
    pub fn pairwise_distances_for(&self, points: &[Point]) -> Result<PairwiseDistanceSet, NetworkError> {
        self.pairwise_distances_within(points, self.snap_tolerance)
    }

    /// As [`RoadNetwork::pairwise_distances_for`], snapping within `tolerance`
    pub fn pairwise_distances_within(
        &self,
        points: &[Point],
        tolerance: f64,
    ) -> Result<PairwiseDistanceSet, NetworkError> {
        let locations = self.locate_all_within(points, tolerance)?;
        self.distances_between(&locations)
    }
}
