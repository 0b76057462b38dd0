//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network loading, snapping or routing error
    #[error("Network error: {0}")]
    Network(#[from] netk_network::NetworkError),

    /// Analysis error
    #[error("Analysis error: {0}")]
    Analysis(#[from] netk_analysis::AnalysisError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Background task failed to complete
    #[error("Worker error: {0}")]
    Worker(String),
}
