//! Metrics and progress for simulation runs

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// A trial that was discarded
#[derive(Debug, Clone, PartialEq)]
pub struct TrialFailure {
    /// Trial index (1-based)
    pub trial: usize,
    /// What went wrong
    pub message: String,
}

/// Metrics collected during a simulation run
#[derive(Debug, Clone, Default)]
pub struct SimulationMetrics {
    /// Trials started
    pub attempted: usize,

    /// Trials that produced a K curve
    pub succeeded: usize,

    /// Trials discarded after a collaborator or estimator failure
    pub failures: Vec<TrialFailure>,

    /// Trials skipped because the run was cancelled
    pub cancelled: usize,

    /// Wall-clock time of the whole run
    pub elapsed: Duration,
}

impl SimulationMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a trial that produced a curve
    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    /// Record a discarded trial
    pub fn record_failure(&mut self, trial: usize, message: impl Into<String>) {
        self.attempted += 1;
        self.failures.push(TrialFailure {
            trial,
            message: message.into(),
        });
    }

    /// Record a trial skipped by cancellation
    pub fn record_cancelled(&mut self) {
        self.cancelled += 1;
    }

    /// Number of discarded trials
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Simulation Summary".to_string(),
            "==================".to_string(),
            format!("Trials attempted: {}", self.attempted),
            format!("Trials succeeded: {}", self.succeeded),
            format!("Trials failed: {}", self.failed()),
            format!("Trials cancelled: {}", self.cancelled),
            format!("Elapsed: {:.2}s", self.elapsed.as_secs_f64()),
        ];

        if !self.failures.is_empty() {
            lines.push(String::new());
            lines.push("Discarded trials:".to_string());
            for failure in &self.failures {
                lines.push(format!("  #{}: {}", failure.trial, failure.message));
            }
        }

        lines.join("\n")
    }
}

/// Shared completion counter for trials running on several threads
#[derive(Debug)]
pub struct TrialProgress {
    total: usize,
    completed: AtomicUsize,
    started: Instant,
}

impl TrialProgress {
    /// Start tracking `total` trials
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    /// Mark one trial complete and report where the run stands
    pub fn complete_one(&self) -> ProgressSnapshot {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        let elapsed = self.started.elapsed();
        ProgressSnapshot {
            completed,
            total: self.total,
            elapsed,
            eta: estimate_remaining(elapsed, completed, self.total),
        }
    }

    /// Trials completed so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }
}

/// Progress after a trial completes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    /// Trials completed, including this one
    pub completed: usize,
    /// Trials in the run
    pub total: usize,
    /// Time since the run started
    pub elapsed: Duration,
    /// Estimated time to finish
    pub eta: Duration,
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Iteration {} complete. Elapsed time: {:.2}s. ETA: {:.2}s.",
            self.completed,
            self.elapsed.as_secs_f64(),
            self.eta.as_secs_f64()
        )
    }
}

/// Linear extrapolation of the remaining time from the average trial time
pub fn estimate_remaining(elapsed: Duration, completed: usize, total: usize) -> Duration {
    if completed == 0 || completed >= total {
        return Duration::ZERO;
    }
    elapsed.mul_f64((total - completed) as f64 / completed as f64)
}
