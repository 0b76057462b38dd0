//! Network K-function estimation
//!
//! `K(r) = (L / n²) · 2c`, the discrete network analogue of Ripley's K. The
//! factor 2 turns the unordered pair count `c` into the ordered-pair sum the
//! statistic is defined over.

use crate::{DistanceBands, KFunctionError, NetworkLength, PairwiseDistanceSet};

/// One row of the K-function table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KFunctionResult {
    /// Band boundary r
    pub distance_band: f64,
    /// Reachable unordered pairs with distance <= r
    pub count: usize,
    /// K(r)
    pub k_function: f64,
}

/// Compute K(r) for a single pair count
///
/// # Examples
///
/// ```
/// use netk_domain::NetworkLength;
/// use netk_domain::estimator::k_function;
///
/// let k = k_function(NetworkLength::new(10_000.0).unwrap(), 3, 1).unwrap();
/// assert!((k - 2222.22).abs() < 0.01);
/// ```
pub fn k_function(
    network_length: NetworkLength,
    point_count: usize,
    pair_count: usize,
) -> Result<f64, KFunctionError> {
    ensure_enough_points(point_count)?;
    let n = point_count as f64;
    Ok(network_length.value() / (n * n) * 2.0 * pair_count as f64)
}

/// Fail unless K(r) is defined for this many points
pub fn ensure_enough_points(point_count: usize) -> Result<(), KFunctionError> {
    if point_count <= 1 {
        return Err(KFunctionError::InsufficientPoints { count: point_count });
    }
    Ok(())
}

/// Compute the full K-function curve over a band sequence
///
/// The point count is checked before any band is evaluated, so a degenerate
/// input produces no partial table.
pub fn compute_k_function(
    network_length: NetworkLength,
    distances: &PairwiseDistanceSet,
    bands: &DistanceBands,
) -> Result<Vec<KFunctionResult>, KFunctionError> {
    ensure_enough_points(distances.point_count())?;

    let reachable = distances.reachable_pairs();
    bands
        .iter()
        .map(|boundary| {
            let count = distances.count_within(boundary);
            if count > reachable {
                return Err(KFunctionError::UnreachablePairPolicyViolation {
                    boundary,
                    counted: count,
                    reachable,
                });
            }
            Ok(KFunctionResult {
                distance_band: boundary,
                count,
                k_function: k_function(network_length, distances.point_count(), count)?,
            })
        })
        .collect()
}

/// K(r) values only, for envelope aggregation
pub fn k_curve(
    network_length: NetworkLength,
    distances: &PairwiseDistanceSet,
    bands: &DistanceBands,
) -> Result<Vec<f64>, KFunctionError> {
    Ok(compute_k_function(network_length, distances, bands)?
        .into_iter()
        .map(|r| r.k_function)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BandParameters, NetworkDistance};

    fn length(value: f64) -> NetworkLength {
        NetworkLength::new(value).unwrap()
    }

    #[test]
    fn test_three_point_scenario() {
        let distances =
            PairwiseDistanceSet::from_reachable(3, [(0, 1, 100.0), (0, 2, 200.0), (1, 2, 300.0)]).unwrap();
        let bands =
            DistanceBands::generate(&BandParameters::new(0.0, 150.0).with_band_count(3), length(10_000.0))
                .unwrap();

        let results = compute_k_function(length(10_000.0), &distances, &bands).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].distance_band, 0.0);
        assert_eq!(results[0].count, 0);
        assert_eq!(results[0].k_function, 0.0);
        assert_eq!(results[1].count, 1);
        assert!((results[1].k_function - 2222.2).abs() < 0.1);
        assert_eq!(results[2].count, 3);
        assert!((results[2].k_function - 6666.7).abs() < 0.1);
    }

    #[test]
    fn test_all_unreachable_yields_zero() {
        let distances = PairwiseDistanceSet::from_entries(
            3,
            [
                (0, 1, NetworkDistance::Unreachable),
                (0, 2, NetworkDistance::Unreachable),
                (1, 2, NetworkDistance::Unreachable),
            ],
        )
        .unwrap();
        let bands = DistanceBands::generate(&BandParameters::new(0.0, 100.0), length(2000.0)).unwrap();

        let results = compute_k_function(length(2000.0), &distances, &bands).unwrap();
        assert_eq!(results.len(), 10);
        assert!(results.iter().all(|r| r.count == 0 && r.k_function == 0.0));
    }

    #[test]
    fn test_single_point_is_insufficient() {
        let distances = PairwiseDistanceSet::builder(1).build();
        let bands = DistanceBands::generate(&BandParameters::default(), length(5000.0)).unwrap();
        let err = compute_k_function(length(5000.0), &distances, &bands).unwrap_err();
        assert_eq!(err, KFunctionError::InsufficientPoints { count: 1 });
    }

    #[test]
    fn test_zero_points_is_insufficient() {
        assert!(k_function(length(1.0), 0, 0).is_err());
    }

    #[test]
    fn test_every_reachable_pair_counted_at_large_radius() {
        let distances = PairwiseDistanceSet::from_entries(
            4,
            [
                (0, 1, NetworkDistance::Reachable(10.0)),
                (0, 2, NetworkDistance::Reachable(900.0)),
                (2, 3, NetworkDistance::Unreachable),
            ],
        )
        .unwrap();
        let bands = DistanceBands::from_boundaries(vec![1000.0]).unwrap();
        let results = compute_k_function(length(1000.0), &distances, &bands).unwrap();
        assert_eq!(results[0].count, 2);
        assert_eq!(results[0].k_function, 1000.0 / 16.0 * 4.0);
    }

    #[test]
    fn test_k_curve_matches_results() {
        let distances = PairwiseDistanceSet::from_reachable(2, [(0, 1, 5.0)]).unwrap();
        let bands = DistanceBands::from_boundaries(vec![1.0, 5.0]).unwrap();
        let curve = k_curve(length(100.0), &distances, &bands).unwrap();
        assert_eq!(curve, vec![0.0, 50.0]);
    }
}
