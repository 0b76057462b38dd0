//! Analysis driver
//!
//! Ties the collaborators together: measure the network, lay out bands, route
//! between the observed points, estimate K(r), then run the permutation test
//! when one is configured.

use crate::simulator::{CancellationToken, ConfidenceEnvelopeSimulator};
use crate::{AnalysisConfig, AnalysisError, SimulationMetrics};
use netk_domain::estimator::{compute_k_function, ensure_enough_points};
use netk_domain::traits::{DistanceProvider, NetworkLengthProvider, RandomPointGenerator};
use netk_domain::{
    ConfidenceEnvelope, DistanceBands, KFunctionResult, NetworkLength, PairwiseDistanceSet, Point,
    Verdict,
};
use std::fmt::Display;

/// Distance set for one iteration of a run
///
/// Iteration 0 is the observed configuration; 1..=T are permutation trials.
#[derive(Debug, Clone)]
pub struct IterationDistances {
    /// Iteration number
    pub iteration: usize,
    /// Pairwise distances for that iteration
    pub distances: PairwiseDistanceSet,
}

/// Everything an analysis run produces
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Total network length used in the estimator
    pub network_length: NetworkLength,
    /// Number of observed points
    pub point_count: usize,
    /// Band boundaries
    pub bands: DistanceBands,
    /// Observed K(r) per band
    pub observed: Vec<KFunctionResult>,
    /// Envelope per band, present when permutations ran
    pub envelope: Option<Vec<ConfidenceEnvelope>>,
    /// Trial accounting, present when permutations ran
    pub simulation: Option<SimulationMetrics>,
    /// Retained distance sets, empty unless requested
    pub distance_sets: Vec<IterationDistances>,
}

impl AnalysisReport {
    /// Observed K(r) judged against the envelope, band by band
    pub fn verdicts(&self) -> Option<Vec<Verdict>> {
        self.envelope.as_ref().map(|envelope| {
            self.observed
                .iter()
                .zip(envelope)
                .map(|(result, bounds)| bounds.classify(result.k_function))
                .collect()
        })
    }

    /// Whether a confidence envelope was computed
    pub fn has_envelope(&self) -> bool {
        self.envelope.is_some()
    }
}

/// Network K-function analysis
///
/// # Examples
///
/// ```
/// use netk_analysis::{AnalysisConfig, NetworkKAnalysis};
/// use netk_domain::Point;
/// use netk_network::{NetworkDefinition, RoadNetwork};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let def = NetworkDefinition::from_json_str(r#"{
///     "nodes": [{"id": 1, "x": 0.0, "y": 0.0}, {"id": 2, "x": 10000.0, "y": 0.0}],
///     "edges": [{"from": 1, "to": 2}]
/// }"#)?;
/// let network = RoadNetwork::from_definition(&def)?;
/// let points = [Point::new(100.0, 0.0), Point::new(200.0, 0.0), Point::new(400.0, 0.0)];
///
/// let config = AnalysisConfig {
///     distance_increment: 150.0,
///     band_count: Some(3),
///     seed: Some(1),
///     ..AnalysisConfig::quick()
/// };
/// let report = NetworkKAnalysis::new(config)?.run(&network, &points)?;
/// assert_eq!(report.observed.iter().map(|r| r.count).collect::<Vec<_>>(), vec![0, 1, 3]);
/// assert!(report.has_envelope());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NetworkKAnalysis {
    config: AnalysisConfig,
    cancel: CancellationToken,
}

impl NetworkKAnalysis {
    /// Create an analysis, rejecting invalid settings up front
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// Stop the permutation test when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Settings this analysis runs with
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run against a network that provides all three collaborators
    pub fn run<N>(&self, network: &N, points: &[Point]) -> Result<AnalysisReport, AnalysisError>
    where
        N: NetworkLengthProvider + DistanceProvider + RandomPointGenerator + Sync,
        <N as NetworkLengthProvider>::Error: Display,
        <N as DistanceProvider>::Error: Display,
        <N as RandomPointGenerator>::Error: Display,
    {
        self.run_with(network, network, network, points)
    }

    /// Run with separately supplied collaborators
    pub fn run_with<L, D, G>(
        &self,
        lengths: &L,
        distances: &D,
        generator: &G,
        points: &[Point],
    ) -> Result<AnalysisReport, AnalysisError>
    where
        L: NetworkLengthProvider,
        L::Error: Display,
        D: DistanceProvider + Sync,
        D::Error: Display,
        G: RandomPointGenerator + Sync,
        G::Error: Display,
    {
        self.log_parameters(points.len());
        ensure_enough_points(points.len())?;

        let network_length = lengths
            .network_length()
            .map_err(|e| AnalysisError::Length(e.to_string()))?;
        let observed = distances
            .pairwise_distances(points, self.config.snap_distance)
            .map_err(|e| AnalysisError::Distance(e.to_string()))?;

        self.run_with_distances(network_length, observed, distances, generator)
    }

    /// Run from an already computed observed distance set
    pub fn run_with_distances<D, G>(
        &self,
        network_length: NetworkLength,
        observed: PairwiseDistanceSet,
        distances: &D,
        generator: &G,
    ) -> Result<AnalysisReport, AnalysisError>
    where
        D: DistanceProvider + Sync,
        D::Error: Display,
        G: RandomPointGenerator + Sync,
        G::Error: Display,
    {
        let point_count = observed.point_count();
        ensure_enough_points(point_count)?;

        let bands = DistanceBands::generate(&self.config.band_parameters(), network_length)?;
        tracing::info!("Network length: {}", network_length);
        tracing::info!("Distance bands ({}): {:?}", bands.len(), bands.as_slice());
        tracing::debug!(
            "Observed distances: {} reachable pairs, {} unreachable",
            observed.reachable_pairs(),
            observed.unreachable_pairs()
        );

        let results = compute_k_function(network_length, &observed, &bands)?;

        let mut distance_sets = Vec::new();
        if self.config.keep_trial_distances {
            distance_sets.push(IterationDistances {
                iteration: 0,
                distances: observed,
            });
        }

        if self.config.permutations == 0 {
            tracing::info!("No permutations requested; skipping confidence envelope");
            return Ok(AnalysisReport {
                network_length,
                point_count,
                bands,
                observed: results,
                envelope: None,
                simulation: None,
                distance_sets,
            });
        }

        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        let output = ConfidenceEnvelopeSimulator::from_config(&self.config, base_seed)
            .with_cancellation(self.cancel.clone())
            .run(generator, distances, network_length, point_count, &bands)?;

        tracing::debug!("{}", output.metrics.summary());

        distance_sets.extend(output.outcomes.into_iter().filter_map(|outcome| {
            outcome.distances.map(|distances| IterationDistances {
                iteration: outcome.trial,
                distances,
            })
        }));

        Ok(AnalysisReport {
            network_length,
            point_count,
            bands,
            observed: results,
            envelope: Some(output.envelope),
            simulation: Some(output.metrics),
            distance_sets,
        })
    }

    fn log_parameters(&self, point_count: usize) {
        let c = &self.config;
        tracing::info!("Points: {}", point_count);
        tracing::info!("Beginning distance: {}", c.beginning_distance);
        tracing::info!("Distance increment: {}", c.distance_increment);
        match c.band_count {
            Some(count) => tracing::info!("Number of distance bands: {}", count),
            None => tracing::info!("Number of distance bands: derived from network length"),
        }
        tracing::info!("Snap distance: {}", c.snap_distance);
        tracing::info!("Permutations: {}", c.permutations);
        tracing::info!("Envelope: {:?}", c.envelope_mode());
    }
}
