//! Uniform random placement along the network

use crate::{NetworkError, RoadNetwork};
use netk_domain::Point;
use rand::distr::{weighted::WeightedIndex, Distribution};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

impl RoadNetwork {
    /// Place `count` points uniformly over network length
    ///
    /// An edge is drawn with probability proportional to its length, then a
    /// position is drawn uniformly along it. The same seed always yields the
    /// same points.
    pub fn sample_points(&self, count: usize, seed: u64) -> Result<Vec<Point>, NetworkError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if self.edges.is_empty() {
            return Err(NetworkError::Sampling(
                "cannot place points on a network without edges".to_string(),
            ));
        }

        let weights = WeightedIndex::new(self.edges.iter().map(|e| e.length))
            .map_err(|e| NetworkError::Sampling(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(seed);

        let points = (0..count)
            .map(|_| {
                let edge = self.edges[weights.sample(&mut rng)];
                let t: f64 = rng.random();
                let a = self.nodes[edge.from];
                let b = self.nodes[edge.to];
                Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
            })
            .collect();

        Ok(points)
    }
}
