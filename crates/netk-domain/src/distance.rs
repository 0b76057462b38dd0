//! Pairwise network distances and cumulative pair counting
//!
//! A [`PairwiseDistanceSet`] holds one value per unordered pair of distinct
//! points. Reachable distances are sorted once at construction so that each
//! band boundary is answered with a binary search.

use crate::KFunctionError;
use std::collections::BTreeMap;

/// Shortest network distance between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NetworkDistance {
    /// A path exists with this length
    Reachable(f64),
    /// No path exists on the network
    Unreachable,
}

impl NetworkDistance {
    /// Length of the path, if one exists
    pub fn value(&self) -> Option<f64> {
        match self {
            NetworkDistance::Reachable(d) => Some(*d),
            NetworkDistance::Unreachable => None,
        }
    }

    /// Whether a path exists
    pub fn is_reachable(&self) -> bool {
        matches!(self, NetworkDistance::Reachable(_))
    }
}

impl From<Option<f64>> for NetworkDistance {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(d) => NetworkDistance::Reachable(d),
            None => NetworkDistance::Unreachable,
        }
    }
}

/// Accumulates pair distances before freezing them into a [`PairwiseDistanceSet`]
///
/// Input may be directed (an origin-destination matrix lists `i→j` and `j→i`);
/// both directions collapse into one unordered pair keeping the shorter
/// reachable distance.
#[derive(Debug, Clone)]
pub struct PairwiseDistanceSetBuilder {
    point_count: usize,
    pairs: BTreeMap<(usize, usize), NetworkDistance>,
}

impl PairwiseDistanceSetBuilder {
    /// Start a set over `point_count` points indexed `0..point_count`
    pub fn new(point_count: usize) -> Self {
        Self {
            point_count,
            pairs: BTreeMap::new(),
        }
    }

    /// Record the distance between points `a` and `b`
    pub fn insert(
        &mut self,
        a: usize,
        b: usize,
        distance: NetworkDistance,
    ) -> Result<&mut Self, KFunctionError> {
        if a == b {
            return Err(KFunctionError::invalid(
                "pair",
                format!("({}, {})", a, b),
                "self-pairs are excluded from the distance set",
            ));
        }
        if a >= self.point_count || b >= self.point_count {
            return Err(KFunctionError::invalid(
                "pair",
                format!("({}, {})", a, b),
                format!("point index out of range for {} points", self.point_count),
            ));
        }
        if let NetworkDistance::Reachable(d) = distance {
            if !d.is_finite() || d < 0.0 {
                return Err(KFunctionError::invalid(
                    "distance",
                    d,
                    "reachable distances must be finite and >= 0",
                ));
            }
        }

        let key = (a.min(b), a.max(b));
        let merged = match (self.pairs.get(&key), distance) {
            (Some(NetworkDistance::Reachable(existing)), NetworkDistance::Reachable(d)) => {
                NetworkDistance::Reachable(existing.min(d))
            }
            (Some(existing @ NetworkDistance::Reachable(_)), NetworkDistance::Unreachable) => *existing,
            _ => distance,
        };
        self.pairs.insert(key, merged);
        Ok(self)
    }

    /// Freeze into an immutable, counted set
    pub fn build(self) -> PairwiseDistanceSet {
        let reachable: Vec<(usize, usize, f64)> = self
            .pairs
            .iter()
            .filter_map(|(&(a, b), d)| d.value().map(|v| (a, b, v)))
            .collect();

        let mut sorted: Vec<f64> = reachable.iter().map(|&(_, _, d)| d).collect();
        sorted.sort_by(f64::total_cmp);

        PairwiseDistanceSet {
            point_count: self.point_count,
            reachable,
            sorted,
        }
    }
}

/// Immutable symmetric distance relation over a point set
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseDistanceSet {
    point_count: usize,
    /// Reachable pairs keyed `(min, max)` in ascending key order
    reachable: Vec<(usize, usize, f64)>,
    /// Reachable distances in ascending order
    sorted: Vec<f64>,
}

impl PairwiseDistanceSet {
    /// Start building a set over `point_count` points
    pub fn builder(point_count: usize) -> PairwiseDistanceSetBuilder {
        PairwiseDistanceSetBuilder::new(point_count)
    }

    /// Build from explicit entries (reachable or not)
    pub fn from_entries<I>(point_count: usize, entries: I) -> Result<Self, KFunctionError>
    where
        I: IntoIterator<Item = (usize, usize, NetworkDistance)>,
    {
        let mut builder = Self::builder(point_count);
        for (a, b, d) in entries {
            builder.insert(a, b, d)?;
        }
        Ok(builder.build())
    }

    /// Build from reachable distances only; every other pair is unreachable
    pub fn from_reachable<I>(point_count: usize, entries: I) -> Result<Self, KFunctionError>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        Self::from_entries(
            point_count,
            entries
                .into_iter()
                .map(|(a, b, d)| (a, b, NetworkDistance::Reachable(d))),
        )
    }

    /// Number of distinct input points
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Number of unordered pairs of distinct points, `n(n-1)/2`
    pub fn pair_count(&self) -> usize {
        self.point_count * self.point_count.saturating_sub(1) / 2
    }

    /// Number of pairs with a network path
    pub fn reachable_pairs(&self) -> usize {
        self.sorted.len()
    }

    /// Number of pairs without a network path (including pairs never supplied)
    pub fn unreachable_pairs(&self) -> usize {
        self.pair_count() - self.reachable_pairs()
    }

    /// Count reachable pairs with distance `<= boundary`
    ///
    /// Unreachable pairs are never counted, whatever the boundary.
    ///
    /// # Examples
    ///
    /// ```
    /// use netk_domain::PairwiseDistanceSet;
    ///
    /// let set = PairwiseDistanceSet::from_reachable(3, [(0, 1, 100.0), (0, 2, 200.0)]).unwrap();
    /// assert_eq!(set.count_within(150.0), 1);
    /// assert_eq!(set.count_within(200.0), 2);
    /// assert_eq!(set.count_within(f64::INFINITY), 2);
    /// ```
    pub fn count_within(&self, boundary: f64) -> usize {
        self.sorted.partition_point(|d| *d <= boundary)
    }

    /// Distance between two points
    pub fn distance(&self, a: usize, b: usize) -> NetworkDistance {
        let key = (a.min(b), a.max(b));
        self.reachable
            .binary_search_by(|&(x, y, _)| (x, y).cmp(&key))
            .map(|idx| NetworkDistance::Reachable(self.reachable[idx].2))
            .unwrap_or(NetworkDistance::Unreachable)
    }

    /// Iterate reachable pairs as `(a, b, distance)` with `a < b`
    pub fn reachable_iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.reachable.iter().copied()
    }

    /// Longest reachable distance
    pub fn max_distance(&self) -> Option<f64> {
        self.sorted.last().copied()
    }
}
