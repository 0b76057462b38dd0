//! Error conditions raised by the K-function core

use thiserror::Error;

/// Errors raised while generating bands, counting pairs, estimating K(r), or
/// aggregating a confidence envelope
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KFunctionError {
    /// A caller-supplied parameter is out of its valid range
    #[error("Invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name as the caller knows it
        name: &'static str,
        /// Offending value, rendered for logging
        value: String,
        /// What the parameter must satisfy
        reason: String,
    },

    /// Fewer than two usable points, so K(r) is undefined
    #[error("Insufficient points: {count} (at least 2 required)")]
    InsufficientPoints {
        /// Number of points supplied
        count: usize,
    },

    /// A band count exceeded the number of reachable pairs
    #[error(
        "Unreachable pair counted at boundary {boundary}: {counted} pairs counted but only {reachable} are reachable"
    )]
    UnreachablePairPolicyViolation {
        /// Band boundary being evaluated
        boundary: f64,
        /// Pairs the counter returned
        counted: usize,
        /// Reachable pairs in the distance set
        reachable: usize,
    },

    /// Too few simulation trials succeeded to build an envelope
    #[error("Incomplete envelope: {succeeded} of {attempted} trials succeeded ({required} required)")]
    IncompleteEnvelope {
        /// Trials that produced a K curve
        succeeded: usize,
        /// Minimum successful trials configured
        required: usize,
        /// Trials attempted
        attempted: usize,
    },
}

impl KFunctionError {
    /// Shorthand for an [`KFunctionError::InvalidParameter`]
    pub fn invalid(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        KFunctionError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
