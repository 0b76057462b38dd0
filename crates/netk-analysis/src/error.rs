//! Error types for analysis runs

use netk_domain::KFunctionError;
use thiserror::Error;

/// Errors that can occur while running a K-function analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Estimator or envelope error
    #[error(transparent)]
    Domain(#[from] KFunctionError),

    /// The network length provider failed
    #[error("Network length error: {0}")]
    Length(String),

    /// The distance provider failed on the observed points
    #[error("Distance computation error: {0}")]
    Distance(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker pool error
    #[error("Worker error: {0}")]
    Worker(String),

    /// The run was cancelled before enough trials completed
    #[error("Analysis cancelled")]
    Cancelled,
}

impl From<toml::de::Error> for AnalysisError {
    fn from(err: toml::de::Error) -> Self {
        AnalysisError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AnalysisError {
    fn from(err: toml::ser::Error) -> Self {
        AnalysisError::Config(err.to_string())
    }
}
