//! Network-level value objects

use crate::KFunctionError;
use std::fmt;

/// Total length of a network dataset, in the linear unit of its projected
/// coordinate system
///
/// Immutable once constructed. Analysis requires a strictly positive, finite
/// length.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct NetworkLength(f64);

impl NetworkLength {
    /// Create a network length
    ///
    /// # Examples
    ///
    /// ```
    /// use netk_domain::NetworkLength;
    ///
    /// assert!(NetworkLength::new(1250.0).is_ok());
    /// assert!(NetworkLength::new(0.0).is_err());
    /// assert!(NetworkLength::new(f64::NAN).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, KFunctionError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(KFunctionError::invalid(
                "network_length",
                value,
                "must be a finite number greater than 0",
            ));
        }
        Ok(Self(value))
    }

    /// Get the raw length
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for NetworkLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A planar point in projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Easting
    pub x: f64,
    /// Northing
    pub y: f64,
}

impl Point {
    /// Create a point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another point
    pub fn euclidean_distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
