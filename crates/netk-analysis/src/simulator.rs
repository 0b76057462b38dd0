//! Confidence envelope simulation
//!
//! Each trial scatters the same number of points uniformly over the network,
//! routes between them, and recomputes K(r) over the observed bands. Trials
//! share nothing but a progress counter, so they run on a rayon pool and are
//! merged afterwards in trial order.

use crate::metrics::{SimulationMetrics, TrialFailure, TrialProgress};
use crate::{AnalysisConfig, AnalysisError, DEFAULT_SNAP_DISTANCE};
use netk_domain::envelope::build_envelope;
use netk_domain::estimator::k_curve;
use netk_domain::traits::{DistanceProvider, RandomPointGenerator};
use netk_domain::{ConfidenceEnvelope, DistanceBands, EnvelopeMode, NetworkLength, PairwiseDistanceSet};
use rayon::prelude::*;
use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Cooperative cancellation flag shared between a run and whoever stops it
///
/// Trials check the flag before starting; a trial already running finishes
/// and its curve is kept.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A trial that produced a K curve
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    /// Trial index (1-based; 0 is the observed configuration)
    pub trial: usize,
    /// Seed the trial's points were drawn with
    pub seed: u64,
    /// K(r) per band
    pub curve: Vec<f64>,
    /// The trial's distance set, when retained
    pub distances: Option<PairwiseDistanceSet>,
}

/// Result of a simulation run
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    /// Per-band bounds
    pub envelope: Vec<ConfidenceEnvelope>,
    /// Successful trials in trial order
    pub outcomes: Vec<TrialOutcome>,
    /// What happened to every trial
    pub metrics: SimulationMetrics,
}

enum TrialResult {
    Completed(TrialOutcome),
    Failed(TrialFailure),
    Skipped,
}

/// Runs the permutation trials and aggregates their curves
#[derive(Debug, Clone)]
pub struct ConfidenceEnvelopeSimulator {
    permutations: usize,
    min_successful_trials: usize,
    mode: EnvelopeMode,
    base_seed: u64,
    snap_tolerance: f64,
    parallel: bool,
    threads: Option<usize>,
    keep_distances: bool,
    cancel: CancellationToken,
}

impl ConfidenceEnvelopeSimulator {
    /// Create a min/max simulator for `permutations` trials
    pub fn new(permutations: usize, base_seed: u64) -> Self {
        Self {
            permutations,
            min_successful_trials: 1,
            mode: EnvelopeMode::MinMax,
            base_seed,
            snap_tolerance: DEFAULT_SNAP_DISTANCE,
            parallel: true,
            threads: None,
            keep_distances: false,
            cancel: CancellationToken::new(),
        }
    }

    /// Create a simulator from analysis settings
    pub fn from_config(config: &AnalysisConfig, base_seed: u64) -> Self {
        Self {
            permutations: config.permutations,
            min_successful_trials: config.min_successful_trials,
            mode: config.envelope_mode(),
            base_seed,
            snap_tolerance: config.snap_distance,
            parallel: config.parallel,
            threads: config.threads,
            keep_distances: config.keep_trial_distances,
            cancel: CancellationToken::new(),
        }
    }

    /// Use a different envelope mode
    pub fn with_mode(mut self, mode: EnvelopeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Require at least this many successful trials
    pub fn with_min_successful_trials(mut self, required: usize) -> Self {
        self.min_successful_trials = required;
        self
    }

    /// Snap tolerance handed to the distance provider for trial points
    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }

    /// Run trials one after another on the calling thread
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Retain each trial's distance set
    pub fn keep_distances(mut self, keep: bool) -> Self {
        self.keep_distances = keep;
        self
    }

    /// Stop starting new trials once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Number of trials this simulator runs
    pub fn permutations(&self) -> usize {
        self.permutations
    }

    /// Run every trial and build the envelope
    ///
    /// `point_count` is the observed point count; each trial places that many
    /// points. Failed trials are discarded and recorded in the metrics.
    ///
    /// # Errors
    ///
    /// - `Domain(IncompleteEnvelope)` when fewer trials succeed than required
    /// - `Cancelled` when cancellation left too few curves for an envelope
    /// - `Worker` when a dedicated thread pool cannot be built
    pub fn run<G, D>(
        &self,
        generator: &G,
        distances: &D,
        network_length: NetworkLength,
        point_count: usize,
        bands: &DistanceBands,
    ) -> Result<SimulationOutput, AnalysisError>
    where
        G: RandomPointGenerator + Sync,
        G::Error: Display,
        D: DistanceProvider + Sync,
        D::Error: Display,
    {
        let start = Instant::now();
        let progress = TrialProgress::new(self.permutations);

        tracing::info!(
            "Running {} permutation trials ({} points each, base seed {})",
            self.permutations,
            point_count,
            self.base_seed
        );

        let run_trial = |trial: usize| -> TrialResult {
            if self.cancel.is_cancelled() {
                return TrialResult::Skipped;
            }

            let seed = trial_seed(self.base_seed, trial);
            let result = generator
                .random_points(point_count, seed)
                .map_err(|e| format!("point generation failed: {}", e))
                .and_then(|points| {
                    distances
                        .pairwise_distances(&points, self.snap_tolerance)
                        .map_err(|e| format!("distance computation failed: {}", e))
                })
                .and_then(|set| {
                    k_curve(network_length, &set, bands)
                        .map(|curve| (curve, set))
                        .map_err(|e| e.to_string())
                });

            tracing::info!("{}", progress.complete_one());

            match result {
                Ok((curve, set)) => TrialResult::Completed(TrialOutcome {
                    trial,
                    seed,
                    curve,
                    distances: self.keep_distances.then_some(set),
                }),
                Err(message) => TrialResult::Failed(TrialFailure { trial, message }),
            }
        };

        let trials = 1..=self.permutations;
        let results: Vec<TrialResult> = if !self.parallel {
            trials.map(run_trial).collect()
        } else if let Some(threads) = self.threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| AnalysisError::Worker(e.to_string()))?;
            pool.install(|| trials.into_par_iter().map(run_trial).collect())
        } else {
            trials.into_par_iter().map(run_trial).collect()
        };

        let mut metrics = SimulationMetrics::new();
        let mut outcomes = Vec::with_capacity(results.len());
        for result in results {
            match result {
                TrialResult::Completed(outcome) => {
                    metrics.record_success();
                    outcomes.push(outcome);
                }
                TrialResult::Failed(failure) => {
                    tracing::warn!("Trial {} discarded: {}", failure.trial, failure.message);
                    metrics.record_failure(failure.trial, failure.message);
                }
                TrialResult::Skipped => metrics.record_cancelled(),
            }
        }
        metrics.elapsed = start.elapsed();

        tracing::info!(
            "Simulation finished: {} of {} trials succeeded in {:.2}s",
            metrics.succeeded,
            self.permutations,
            metrics.elapsed.as_secs_f64()
        );

        if metrics.cancelled > 0 {
            if outcomes.len() < self.min_successful_trials.max(1) {
                return Err(AnalysisError::Cancelled);
            }
            tracing::warn!(
                "Cancelled after {} trials; envelope built from completed trials only",
                metrics.attempted
            );
        }

        let curves: Vec<Vec<f64>> = outcomes.iter().map(|o| o.curve.clone()).collect();
        let envelope = build_envelope(
            bands,
            &curves,
            self.mode,
            metrics.attempted,
            self.min_successful_trials,
        )?;

        Ok(SimulationOutput {
            envelope,
            outcomes,
            metrics,
        })
    }
}

/// Seed for one trial, independent of which thread runs it
///
/// SplitMix64 finalizer over the base seed offset by the trial index, so
/// neighbouring trials get unrelated streams.
pub fn trial_seed(base_seed: u64, trial: usize) -> u64 {
    let mut z = base_seed.wrapping_add((trial as u64).wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
