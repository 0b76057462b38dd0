//! Integration tests for netk-analysis
//!
//! Mock collaborators pin down the driver's behavior; the in-memory road
//! network checks the whole pipeline.

use netk_analysis::{
    trial_seed, AnalysisConfig, AnalysisError, CancellationToken, EnvelopeSetting,
    NetworkKAnalysis,
};
use netk_domain::estimator::k_curve;
use netk_domain::traits::{DistanceProvider, NetworkLengthProvider, RandomPointGenerator};
use netk_domain::{KFunctionError, NetworkLength, PairwiseDistanceSet, Point, Verdict};
use netk_network::{NetworkDefinition, RoadNetwork};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Fixed-length network with straight-line distances; random configurations
/// are evenly spaced with a spacing derived from the seed
struct MockNetwork {
    length: f64,
    /// Generator calls that failed
    failing_trials: AtomicUsize,
    /// Fail when the seed is a multiple of this
    fail_every: Option<u64>,
    distance_calls: AtomicUsize,
    /// Bits of the last snap tolerance asked for
    last_snap_tolerance: AtomicU64,
}

impl MockNetwork {
    fn new(length: f64) -> Self {
        Self {
            length,
            failing_trials: AtomicUsize::new(0),
            fail_every: None,
            distance_calls: AtomicUsize::new(0),
            last_snap_tolerance: AtomicU64::new(0),
        }
    }

    fn failing_always() -> Self {
        Self::failing_every(1)
    }

    fn failing_every(every: u64) -> Self {
        Self {
            fail_every: Some(every),
            ..Self::new(10_000.0)
        }
    }

    fn last_snap_tolerance(&self) -> f64 {
        f64::from_bits(self.last_snap_tolerance.load(Ordering::SeqCst))
    }
}

impl NetworkLengthProvider for MockNetwork {
    type Error = String;

    fn network_length(&self) -> Result<NetworkLength, String> {
        NetworkLength::new(self.length).map_err(|e| e.to_string())
    }
}

impl DistanceProvider for MockNetwork {
    type Error = String;

    fn pairwise_distances(
        &self,
        points: &[Point],
        snap_tolerance: f64,
    ) -> Result<PairwiseDistanceSet, String> {
        self.distance_calls.fetch_add(1, Ordering::SeqCst);
        self.last_snap_tolerance
            .store(snap_tolerance.to_bits(), Ordering::SeqCst);
        let mut entries = Vec::new();
        for i in 0..points.len() {
            for j in i + 1..points.len() {
                entries.push((i, j, points[i].euclidean_distance(&points[j])));
            }
        }
        PairwiseDistanceSet::from_reachable(points.len(), entries).map_err(|e| e.to_string())
    }
}

impl RandomPointGenerator for MockNetwork {
    type Error = String;

    fn random_points(&self, count: usize, seed: u64) -> Result<Vec<Point>, String> {
        if let Some(every) = self.fail_every {
            if seed % every == 0 {
                self.failing_trials.fetch_add(1, Ordering::SeqCst);
                return Err("generator offline".to_string());
            }
        }
        let spacing = (seed % 400) as f64 + 1.0;
        Ok((0..count).map(|i| Point::new(i as f64 * spacing, 0.0)).collect())
    }
}

/// Three points whose pairwise distances are 100, 200 and 300
fn scenario_points() -> Vec<Point> {
    vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(300.0, 0.0)]
}

fn scenario_config() -> AnalysisConfig {
    AnalysisConfig {
        beginning_distance: 0.0,
        distance_increment: 150.0,
        band_count: Some(3),
        seed: Some(17),
        ..AnalysisConfig::default()
    }
}

#[test]
fn test_observed_scenario() {
    let network = MockNetwork::new(10_000.0);
    let report = NetworkKAnalysis::new(scenario_config())
        .unwrap()
        .run(&network, &scenario_points())
        .unwrap();

    assert_eq!(report.bands.as_slice(), &[0.0, 150.0, 300.0]);
    let counts: Vec<usize> = report.observed.iter().map(|r| r.count).collect();
    assert_eq!(counts, vec![0, 1, 3]);
    assert!((report.observed[1].k_function - 2222.22).abs() < 0.01);
    assert!((report.observed[2].k_function - 6666.67).abs() < 0.01);
}

#[test]
fn test_zero_permutations_has_no_envelope() {
    let network = MockNetwork::new(10_000.0);
    let report = NetworkKAnalysis::new(scenario_config())
        .unwrap()
        .run(&network, &scenario_points())
        .unwrap();

    assert!(report.envelope.is_none());
    assert!(report.simulation.is_none());
    assert!(report.verdicts().is_none());
    // Only the observed configuration was routed
    assert_eq!(network.distance_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_nine_permutations_all_contribute() {
    let network = MockNetwork::new(10_000.0);
    let config = AnalysisConfig {
        permutations: 9,
        ..scenario_config()
    };
    let report = NetworkKAnalysis::new(config)
        .unwrap()
        .run(&network, &scenario_points())
        .unwrap();

    let metrics = report.simulation.as_ref().unwrap();
    assert_eq!(metrics.attempted, 9);
    assert_eq!(metrics.succeeded, 9);
    assert_eq!(metrics.failed(), 0);
    assert_eq!(report.envelope.as_ref().unwrap().len(), 3);
    assert_eq!(report.verdicts().unwrap().len(), 3);
    assert_eq!(network.distance_calls.load(Ordering::SeqCst), 10);
}

#[test]
fn test_single_point_fails_before_any_work() {
    let network = MockNetwork::new(10_000.0);
    let result = NetworkKAnalysis::new(scenario_config())
        .unwrap()
        .run(&network, &[Point::new(0.0, 0.0)]);

    assert!(matches!(
        result,
        Err(AnalysisError::Domain(KFunctionError::InsufficientPoints { count: 1 }))
    ));
    assert_eq!(network.distance_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_invalid_config_rejected() {
    let config = AnalysisConfig {
        distance_increment: -5.0,
        ..AnalysisConfig::default()
    };
    assert!(NetworkKAnalysis::new(config).is_err());
}

#[test]
fn test_bad_network_length_reported() {
    let network = MockNetwork::new(0.0);
    let result = NetworkKAnalysis::new(scenario_config())
        .unwrap()
        .run(&network, &scenario_points());
    assert!(matches!(result, Err(AnalysisError::Length(_))));
}

#[test]
fn test_all_trials_failing_is_incomplete_envelope() {
    let network = MockNetwork::failing_always();
    let config = AnalysisConfig {
        permutations: 9,
        ..scenario_config()
    };
    let result = NetworkKAnalysis::new(config)
        .unwrap()
        .run(&network, &scenario_points());

    match result {
        Err(AnalysisError::Domain(KFunctionError::IncompleteEnvelope {
            succeeded,
            required,
            attempted,
        })) => {
            assert_eq!(succeeded, 0);
            assert_eq!(required, 1);
            assert_eq!(attempted, 9);
        }
        other => panic!("Expected IncompleteEnvelope, got {:?}", other),
    }
    assert_eq!(network.failing_trials.load(Ordering::SeqCst), 9);
}

#[test]
fn test_failed_trials_are_left_out_of_the_envelope() {
    let network = MockNetwork::failing_every(2);
    let config = AnalysisConfig {
        permutations: 99,
        ..scenario_config()
    };
    let base_seed = config.seed.unwrap();
    let report = NetworkKAnalysis::new(config.clone())
        .unwrap()
        .run(&network, &scenario_points())
        .unwrap();

    let surviving: Vec<u64> = (1..=99)
        .map(|t| trial_seed(base_seed, t))
        .filter(|seed| seed % 2 != 0)
        .collect();
    assert!(!surviving.is_empty() && surviving.len() < 99);

    let metrics = report.simulation.as_ref().unwrap();
    assert_eq!(metrics.attempted, 99);
    assert_eq!(metrics.succeeded, surviving.len());
    assert_eq!(metrics.failed(), 99 - surviving.len());
    assert_eq!(network.failing_trials.load(Ordering::SeqCst), 99 - surviving.len());

    // Rebuild the min/max envelope from the surviving configurations alone
    let curves: Vec<Vec<f64>> = surviving
        .iter()
        .map(|seed| {
            let points = network.random_points(3, *seed).unwrap();
            let set = network.pairwise_distances(&points, 25.0).unwrap();
            k_curve(report.network_length, &set, &report.bands).unwrap()
        })
        .collect();
    for (band, bounds) in report.envelope.as_ref().unwrap().iter().enumerate() {
        let values = curves.iter().map(|c| c[band]);
        let lower = values.clone().fold(f64::INFINITY, f64::min);
        let upper = values.fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(bounds.lower_bound, lower);
        assert_eq!(bounds.upper_bound, upper);
    }

    // The same run with a minimum above the survivors has no envelope
    let strict = AnalysisConfig {
        min_successful_trials: 99,
        ..config
    };
    let result = NetworkKAnalysis::new(strict)
        .unwrap()
        .run(&MockNetwork::failing_every(2), &scenario_points());
    match result {
        Err(AnalysisError::Domain(KFunctionError::IncompleteEnvelope {
            succeeded,
            required,
            attempted,
        })) => {
            assert_eq!(succeeded, surviving.len());
            assert_eq!(required, 99);
            assert_eq!(attempted, 99);
        }
        other => panic!("Expected IncompleteEnvelope, got {:?}", other),
    }
}

#[test]
fn test_snap_distance_reaches_distance_provider() {
    let network = MockNetwork::new(10_000.0);
    let config = AnalysisConfig {
        snap_distance: 100.0,
        ..scenario_config()
    };
    NetworkKAnalysis::new(config)
        .unwrap()
        .run(&network, &scenario_points())
        .unwrap();
    assert_eq!(network.last_snap_tolerance(), 100.0);
}

#[test]
fn test_snap_distance_applies_to_road_network() {
    let def = NetworkDefinition::from_json_str(
        r#"{
            "nodes": [{"id": 1, "x": 0.0, "y": 0.0}, {"id": 2, "x": 10000.0, "y": 0.0}],
            "edges": [{"from": 1, "to": 2}]
        }"#,
    )
    .unwrap();
    // Built with the default tolerance of 25
    let network = RoadNetwork::from_definition(&def).unwrap();
    let points = [Point::new(100.0, 50.0), Point::new(350.0, 50.0), Point::new(900.0, 0.0)];

    let tight = AnalysisConfig {
        snap_distance: 25.0,
        ..scenario_config()
    };
    let result = NetworkKAnalysis::new(tight).unwrap().run(&network, &points);
    assert!(matches!(result, Err(AnalysisError::Distance(_))));

    let loose = AnalysisConfig {
        snap_distance: 100.0,
        ..scenario_config()
    };
    let report = NetworkKAnalysis::new(loose).unwrap().run(&network, &points).unwrap();
    let counts: Vec<usize> = report.observed.iter().map(|r| r.count).collect();
    assert_eq!(counts, vec![0, 0, 1]);
}

#[test]
fn test_same_seed_same_envelope() {
    let network = MockNetwork::new(10_000.0);
    let config = AnalysisConfig {
        permutations: 19,
        ..scenario_config()
    };
    let first = NetworkKAnalysis::new(config.clone())
        .unwrap()
        .run(&network, &scenario_points())
        .unwrap();
    let second = NetworkKAnalysis::new(config)
        .unwrap()
        .run(&network, &scenario_points())
        .unwrap();
    assert_eq!(first.envelope, second.envelope);
}

#[test]
fn test_trial_distances_retained() {
    let network = MockNetwork::new(10_000.0);
    let config = AnalysisConfig {
        permutations: 4,
        keep_trial_distances: true,
        ..scenario_config()
    };
    let report = NetworkKAnalysis::new(config)
        .unwrap()
        .run(&network, &scenario_points())
        .unwrap();

    let iterations: Vec<usize> = report.distance_sets.iter().map(|d| d.iteration).collect();
    assert_eq!(iterations, vec![0, 1, 2, 3, 4]);
    assert!(report.distance_sets.iter().all(|d| d.distances.point_count() == 3));
}

#[test]
fn test_cancelled_run() {
    let network = MockNetwork::new(10_000.0);
    let token = CancellationToken::new();
    token.cancel();
    let config = AnalysisConfig {
        permutations: 9,
        ..scenario_config()
    };
    let result = NetworkKAnalysis::new(config)
        .unwrap()
        .with_cancellation(token)
        .run(&network, &scenario_points());
    assert!(matches!(result, Err(AnalysisError::Cancelled)));
}

#[test]
fn test_clustered_points_on_road_network() {
    // Straight road 10 km long; all observed points within 30 m of each other
    let def = NetworkDefinition::from_json_str(
        r#"{
            "nodes": [{"id": 1, "x": 0.0, "y": 0.0}, {"id": 2, "x": 10000.0, "y": 0.0}],
            "edges": [{"from": 1, "to": 2}]
        }"#,
    )
    .unwrap();
    let network = RoadNetwork::from_definition(&def).unwrap();
    let points: Vec<Point> = (0..10).map(|i| Point::new(5000.0 + i as f64 * 3.0, 0.0)).collect();

    let config = AnalysisConfig {
        beginning_distance: 50.0,
        distance_increment: 50.0,
        band_count: Some(4),
        permutations: 99,
        seed: Some(3),
        envelope_mode: EnvelopeSetting::Percentile {
            lower: 2.5,
            upper: 97.5,
        },
        ..AnalysisConfig::default()
    };
    let report = NetworkKAnalysis::new(config).unwrap().run(&network, &points).unwrap();

    assert_eq!(report.network_length.value(), 10_000.0);
    assert_eq!(report.simulation.as_ref().unwrap().succeeded, 99);
    assert_eq!(report.verdicts().unwrap()[0], Verdict::Clustered);
}
