//! Error types for the in-memory network backend

use netk_domain::KFunctionError;
use thiserror::Error;

/// Errors that can occur while loading, snapping to, routing over, or
/// sampling a network
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Failed to read a network or points file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Structurally invalid network definition
    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    /// A point lies farther from every edge than the snap tolerance
    #[error("Point {index} is {distance:.3} from the nearest edge (snap tolerance {tolerance})")]
    Unsnappable {
        /// Position of the point in the input
        index: usize,
        /// Distance to the nearest edge, infinite if the network has no edges
        distance: f64,
        /// Configured snap tolerance
        tolerance: f64,
    },

    /// Random placement failed
    #[error("Sampling error: {0}")]
    Sampling(String),

    /// Distance set rejected by the domain layer
    #[error("Domain error: {0}")]
    Domain(#[from] KFunctionError),
}
