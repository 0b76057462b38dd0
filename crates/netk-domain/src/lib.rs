//! Netk Domain Layer
//!
//! This crate contains the Network K-function estimator and the pure pieces of
//! the confidence-envelope test. It performs no I/O and knows nothing about how
//! networks are stored or how shortest paths are found; those concerns sit
//! behind the collaborator traits in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Network length**: total length of the network the points lie on
//! - **Pairwise distance set**: network distance (or "unreachable") per unordered point pair
//! - **Distance bands**: cumulative thresholds at which K(r) is evaluated
//! - **K-function**: `K(r) = (L / n²) · 2c`, where `c` counts pairs within `r`
//! - **Confidence envelope**: per-band bounds of K(r) across random configurations
//!
//! ## Example
//!
//! ```
//! use netk_domain::{BandParameters, DistanceBands, NetworkLength, PairwiseDistanceSet};
//! use netk_domain::estimator::compute_k_function;
//!
//! let length = NetworkLength::new(10_000.0).unwrap();
//! let distances = PairwiseDistanceSet::from_reachable(3, [(0, 1, 100.0), (0, 2, 200.0), (1, 2, 300.0)]).unwrap();
//! let params = BandParameters::new(0.0, 150.0).with_band_count(3);
//! let bands = DistanceBands::generate(&params, length).unwrap();
//!
//! let results = compute_k_function(length, &distances, &bands).unwrap();
//! assert_eq!(results.iter().map(|r| r.count).collect::<Vec<_>>(), vec![0, 1, 3]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod band;
pub mod distance;
pub mod envelope;
pub mod error;
pub mod estimator;
pub mod network;
pub mod traits;

// Re-exports for convenience
pub use band::{BandParameters, DistanceBands, MAX_BAND_COUNT};
pub use distance::{NetworkDistance, PairwiseDistanceSet, PairwiseDistanceSetBuilder};
pub use envelope::{ConfidenceEnvelope, EnvelopeMode, Verdict};
pub use error::KFunctionError;
pub use estimator::KFunctionResult;
pub use network::{NetworkLength, Point};
