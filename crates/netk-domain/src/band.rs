//! Distance band generation
//!
//! Bands are cumulative thresholds `r_i = beginning_distance + i · increment`.
//! When no band count is supplied it is derived so that the last band does not
//! pass half the network length, beyond which K(r) stops being meaningful on a
//! finite network.

use crate::{KFunctionError, NetworkLength};

/// Default beginning distance
pub const DEFAULT_BEGINNING_DISTANCE: f64 = 0.0;

/// Default distance increment
pub const DEFAULT_DISTANCE_INCREMENT: f64 = 1000.0;

/// Largest number of bands, supplied or derived
pub const MAX_BAND_COUNT: usize = 100_000;

/// Parameters controlling band generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandParameters {
    /// First band boundary (>= 0)
    pub beginning_distance: f64,
    /// Spacing between consecutive boundaries (> 0)
    pub increment: f64,
    /// Explicit number of bands; derived from the network length when `None`
    pub band_count: Option<usize>,
}

impl BandParameters {
    /// Create parameters with a derived band count
    pub fn new(beginning_distance: f64, increment: f64) -> Self {
        Self {
            beginning_distance,
            increment,
            band_count: None,
        }
    }

    /// Use an explicit band count
    pub fn with_band_count(mut self, band_count: usize) -> Self {
        self.band_count = Some(band_count);
        self
    }

    /// Check parameter ranges without generating anything
    pub fn validate(&self) -> Result<(), KFunctionError> {
        if !self.beginning_distance.is_finite() || self.beginning_distance < 0.0 {
            return Err(KFunctionError::invalid(
                "beginning_distance",
                self.beginning_distance,
                "must be a finite number >= 0",
            ));
        }
        if !self.increment.is_finite() || self.increment <= 0.0 {
            return Err(KFunctionError::invalid(
                "distance_increment",
                self.increment,
                "must be a finite number > 0",
            ));
        }
        if self.band_count == Some(0) {
            return Err(KFunctionError::invalid(
                "band_count",
                0,
                "must be greater than 0 when supplied",
            ));
        }
        if let Some(count) = self.band_count.filter(|c| *c > MAX_BAND_COUNT) {
            return Err(KFunctionError::invalid(
                "band_count",
                count,
                format!("must not exceed {}", MAX_BAND_COUNT),
            ));
        }
        Ok(())
    }

    /// Band count that applies to a network of the given length
    ///
    /// A supplied count is used as-is. Otherwise
    /// `ceil((L/2 - beginning_distance) / increment)`, never less than one.
    /// Either way the count is capped at [`MAX_BAND_COUNT`].
    pub fn resolve_band_count(&self, network_length: NetworkLength) -> Result<usize, KFunctionError> {
        self.validate()?;

        if let Some(count) = self.band_count {
            return Ok(count);
        }

        let span = network_length.value() / 2.0 - self.beginning_distance;
        let derived = (span / self.increment).ceil();
        if !derived.is_finite() || derived > MAX_BAND_COUNT as f64 {
            return Err(KFunctionError::invalid(
                "band_count",
                derived,
                format!(
                    "derived count exceeds {}; raise distance_increment or supply band_count",
                    MAX_BAND_COUNT
                ),
            ));
        }
        if derived < 1.0 {
            return Ok(1);
        }
        Ok(derived as usize)
    }
}

impl Default for BandParameters {
    fn default() -> Self {
        Self::new(DEFAULT_BEGINNING_DISTANCE, DEFAULT_DISTANCE_INCREMENT)
    }
}

/// Ordered, strictly increasing band boundaries
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceBands {
    boundaries: Vec<f64>,
}

impl DistanceBands {
    /// Generate the band sequence for a network
    ///
    /// # Examples
    ///
    /// ```
    /// use netk_domain::{BandParameters, DistanceBands, NetworkLength};
    ///
    /// let length = NetworkLength::new(1000.0).unwrap();
    /// let bands = DistanceBands::generate(&BandParameters::new(0.0, 100.0), length).unwrap();
    /// assert_eq!(bands.len(), 5);
    /// assert_eq!(bands.as_slice(), &[0.0, 100.0, 200.0, 300.0, 400.0]);
    /// ```
    pub fn generate(
        params: &BandParameters,
        network_length: NetworkLength,
    ) -> Result<Self, KFunctionError> {
        let count = params.resolve_band_count(network_length)?;

        // Multiply rather than accumulate so r_i carries one rounding step.
        let boundaries: Vec<f64> = (0..count)
            .map(|i| params.beginning_distance + i as f64 * params.increment)
            .collect();

        if boundaries.windows(2).any(|w| w[1] <= w[0]) {
            return Err(KFunctionError::invalid(
                "distance_increment",
                params.increment,
                "too small to separate bands at this magnitude",
            ));
        }

        Ok(Self { boundaries })
    }

    /// Build bands from explicit boundaries (must be finite, >= 0, strictly increasing)
    pub fn from_boundaries(boundaries: Vec<f64>) -> Result<Self, KFunctionError> {
        if boundaries.is_empty() {
            return Err(KFunctionError::invalid("bands", "[]", "at least one band is required"));
        }
        if let Some(bad) = boundaries.iter().find(|b| !b.is_finite() || **b < 0.0) {
            return Err(KFunctionError::invalid("bands", bad, "boundaries must be finite and >= 0"));
        }
        if boundaries.windows(2).any(|w| w[1] <= w[0]) {
            return Err(KFunctionError::invalid(
                "bands",
                format!("{:?}", boundaries),
                "boundaries must be strictly increasing",
            ));
        }
        Ok(Self { boundaries })
    }

    /// Number of bands
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Whether there are no bands (never true for generated bands)
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Boundaries in increasing order
    pub fn as_slice(&self) -> &[f64] {
        &self.boundaries
    }

    /// Iterate over boundaries
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.boundaries.iter().copied()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: generated bands strictly increase
        #[test]
        fn test_bands_strictly_increase(
            begin in 0.0f64..5_000.0,
            increment in 0.5f64..2_000.0,
            network in 1.0f64..100_000.0,
        ) {
            let params = BandParameters::new(begin, increment);
            let bands = DistanceBands::generate(&params, NetworkLength::new(network).unwrap()).unwrap();
            prop_assert!(bands.as_slice().windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(bands.as_slice()[0], begin);
        }

        /// Property: derived count follows the half-length formula
        #[test]
        fn test_derived_count_matches_formula(
            begin in 0.0f64..1_000.0,
            increment in 1.0f64..500.0,
            network in 2_500.0f64..50_000.0,
        ) {
            let params = BandParameters::new(begin, increment);
            let bands = DistanceBands::generate(&params, NetworkLength::new(network).unwrap()).unwrap();
            let expected = ((network / 2.0 - begin) / increment).ceil().max(1.0) as usize;
            prop_assert_eq!(bands.len(), expected);
        }
    }
}
