//! Netk Analysis
//!
//! Runs a Network K-function analysis end to end and, when asked, the
//! permutation test that puts a confidence envelope around it.
//!
//! # Overview
//!
//! - **Driver** ([`NetworkKAnalysis`]): echoes parameters, measures the
//!   network, lays out bands, computes the observed K(r)
//! - **Simulator** ([`ConfidenceEnvelopeSimulator`]): T random configurations
//!   of the same size, routed and estimated in parallel, reduced to per-band
//!   bounds
//! - **Metrics** ([`SimulationMetrics`], [`TrialProgress`]): trial accounting
//!   and elapsed/ETA progress lines
//!
//! Collaborators (network length, routing, random placement) are injected
//! through the traits in `netk_domain::traits`, so any backend works.
//!
//! # Usage
//!
//! ```no_run
//! use netk_analysis::{AnalysisConfig, NetworkKAnalysis};
//! use netk_network::{load_points, RoadNetwork};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let network = RoadNetwork::from_file("streets.toml")?;
//! let points = load_points("incidents.json")?;
//!
//! let report = NetworkKAnalysis::new(AnalysisConfig::thorough())?.run(&network, &points)?;
//! for (result, verdict) in report.observed.iter().zip(report.verdicts().unwrap_or_default()) {
//!     println!("{:>8} {:>12.2} {}", result.distance_band, result.k_function, verdict);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use netk_analysis::AnalysisConfig;
//!
//! // Observed curve only
//! let config = AnalysisConfig::default();
//!
//! // 9 permutations
//! let config = AnalysisConfig::quick();
//!
//! // 999 permutations
//! let config = AnalysisConfig::thorough();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod analysis;
mod config;
mod error;
mod metrics;
mod simulator;

pub use analysis::{AnalysisReport, IterationDistances, NetworkKAnalysis};
pub use config::{AnalysisConfig, EnvelopeSetting, PermutationPreset, DEFAULT_SNAP_DISTANCE};
pub use error::AnalysisError;
pub use metrics::{ProgressSnapshot, SimulationMetrics, TrialFailure, TrialProgress};
pub use simulator::{
    trial_seed, CancellationToken, ConfidenceEnvelopeSimulator, SimulationOutput, TrialOutcome,
};
