//! Netk In-Memory Network Backend
//!
//! Implements the collaborator traits from `netk-domain` over a road network
//! held in memory.
//!
//! # Architecture
//!
//! - Networks load from JSON or TOML ([`NetworkDefinition`])
//! - Points snap to the nearest edge within a tolerance given per call
//! - Distances come from one Dijkstra search per origin, origins in parallel
//! - Random points are placed uniformly over network length
//!
//! # Examples
//!
//! ```
//! use netk_domain::traits::{DistanceProvider, NetworkLengthProvider};
//! use netk_domain::Point;
//! use netk_network::{NetworkDefinition, RoadNetwork};
//!
//! let def = NetworkDefinition::from_json_str(r#"{
//!     "nodes": [{"id": 1, "x": 0.0, "y": 0.0}, {"id": 2, "x": 1000.0, "y": 0.0}],
//!     "edges": [{"from": 1, "to": 2}]
//! }"#).unwrap();
//! let network = RoadNetwork::from_definition(&def).unwrap();
//!
//! assert_eq!(network.network_length().unwrap().value(), 1000.0);
//! let distances = network
//!     .pairwise_distances(&[Point::new(100.0, 0.0), Point::new(400.0, 5.0)], 25.0)
//!     .unwrap();
//! assert_eq!(distances.count_within(300.0), 1);
//! ```

#![warn(missing_docs)]

mod error;
mod graph;
pub mod model;
mod routing;
mod sampling;
pub mod snap;

pub use error::NetworkError;
pub use graph::{Edge, RoadNetwork, DEFAULT_SNAP_TOLERANCE};
pub use model::{load_points, NetworkDefinition};
pub use snap::NetworkLocation;

use netk_domain::traits::{DistanceProvider, NetworkLengthProvider, RandomPointGenerator};
use netk_domain::{NetworkLength, PairwiseDistanceSet, Point};

impl NetworkLengthProvider for RoadNetwork {
    type Error = NetworkError;

    fn network_length(&self) -> Result<NetworkLength, Self::Error> {
        self.length()
    }
}

impl DistanceProvider for RoadNetwork {
    type Error = NetworkError;

    fn pairwise_distances(
        &self,
        points: &[Point],
        snap_tolerance: f64,
    ) -> Result<PairwiseDistanceSet, Self::Error> {
        self.pairwise_distances_within(points, snap_tolerance)
    }
}

impl RandomPointGenerator for RoadNetwork {
    type Error = NetworkError;

    fn random_points(&self, count: usize, seed: u64) -> Result<Vec<Point>, Self::Error> {
        self.sample_points(count, seed)
    }
}
