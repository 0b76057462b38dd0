//! Configuration for K-function analysis runs
//!
//! Band layout, snapping, and the permutation test settings.

use crate::AnalysisError;
use netk_domain::band::{DEFAULT_BEGINNING_DISTANCE, DEFAULT_DISTANCE_INCREMENT};
use netk_domain::{BandParameters, EnvelopeMode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default snap tolerance, in network units
pub const DEFAULT_SNAP_DISTANCE: f64 = 25.0;

/// Configuration for an analysis run
///
/// # Examples
///
/// ```
/// use netk_analysis::AnalysisConfig;
///
/// // Observed K-function only
/// let config = AnalysisConfig::default();
/// assert_eq!(config.permutations, 0);
///
/// // Quick look at the envelope
/// let config = AnalysisConfig::quick();
/// assert_eq!(config.permutations, 9);
///
/// // Publication run
/// let config = AnalysisConfig::thorough();
/// assert_eq!(config.permutations, 999);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// First band boundary
    /// Default: 0
    pub beginning_distance: f64,

    /// Spacing between band boundaries
    /// Default: 1000
    pub distance_increment: f64,

    /// Number of bands; derived from half the network length when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_count: Option<usize>,

    /// Maximum distance a point may move to reach the network
    /// Default: 25
    pub snap_distance: f64,

    /// Random permutations for the confidence envelope; 0 disables it
    pub permutations: usize,

    /// Trials that must succeed for the envelope to be reported
    /// Default: 1
    pub min_successful_trials: usize,

    /// Base seed; a random one is drawn (and logged) when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Run trials on a thread pool
    /// Default: true
    pub parallel: bool,

    /// Thread pool size; rayon's global pool when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,

    /// Keep every trial's distance set for export
    pub keep_trial_distances: bool,

    /// How envelope bounds are taken
    pub envelope_mode: EnvelopeSetting,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            beginning_distance: DEFAULT_BEGINNING_DISTANCE,
            distance_increment: DEFAULT_DISTANCE_INCREMENT,
            band_count: None,
            snap_distance: DEFAULT_SNAP_DISTANCE,
            permutations: 0,
            min_successful_trials: 1,
            seed: None,
            parallel: true,
            threads: None,
            keep_trial_distances: false,
            envelope_mode: EnvelopeSetting::MinMax,
        }
    }
}

impl AnalysisConfig {
    /// Nine permutations, min/max envelope
    pub fn quick() -> Self {
        Self {
            permutations: PermutationPreset::Nine.count(),
            ..Self::default()
        }
    }

    /// 999 permutations, min/max envelope
    pub fn thorough() -> Self {
        Self {
            permutations: PermutationPreset::NineHundredNinetyNine.count(),
            ..Self::default()
        }
    }

    /// Parse from TOML; missing fields take their defaults
    pub fn from_toml(toml_str: &str) -> Result<Self, AnalysisError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, AnalysisError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Band parameters for the estimator
    pub fn band_parameters(&self) -> BandParameters {
        let params = BandParameters::new(self.beginning_distance, self.distance_increment);
        match self.band_count {
            Some(count) => params.with_band_count(count),
            None => params,
        }
    }

    /// Envelope mode for the aggregator
    pub fn envelope_mode(&self) -> EnvelopeMode {
        self.envelope_mode.into()
    }

    /// Check every setting before any work starts
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.band_parameters().validate()?;
        self.envelope_mode().validate()?;

        if !self.snap_distance.is_finite() || self.snap_distance < 0.0 {
            return Err(AnalysisError::Config(format!(
                "snap_distance must be finite and >= 0, got {}",
                self.snap_distance
            )));
        }
        if self.permutations > 0 && self.min_successful_trials > self.permutations {
            return Err(AnalysisError::Config(format!(
                "min_successful_trials ({}) exceeds permutations ({})",
                self.min_successful_trials, self.permutations
            )));
        }
        if self.threads == Some(0) {
            return Err(AnalysisError::Config("threads must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Serializable form of [`EnvelopeMode`]
///
/// ```toml
/// [envelope_mode]
/// mode = "percentile"
/// lower = 2.5
/// upper = 97.5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EnvelopeSetting {
    /// Minimum and maximum across trials
    #[default]
    MinMax,
    /// Nearest-rank percentiles
    Percentile {
        /// Lower percentile
        lower: f64,
        /// Upper percentile
        upper: f64,
    },
}

impl From<EnvelopeSetting> for EnvelopeMode {
    fn from(setting: EnvelopeSetting) -> Self {
        match setting {
            EnvelopeSetting::MinMax => EnvelopeMode::MinMax,
            EnvelopeSetting::Percentile { lower, upper } => EnvelopeMode::Percentile { lower, upper },
        }
    }
}

/// The permutation counts offered to users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermutationPreset {
    /// Observed K-function only
    None,
    /// 9 permutations
    Nine,
    /// 99 permutations
    NinetyNine,
    /// 999 permutations
    NineHundredNinetyNine,
}

impl PermutationPreset {
    /// Every preset, smallest first
    pub const ALL: [PermutationPreset; 4] = [
        PermutationPreset::None,
        PermutationPreset::Nine,
        PermutationPreset::NinetyNine,
        PermutationPreset::NineHundredNinetyNine,
    ];

    /// Number of permutations
    pub fn count(&self) -> usize {
        match self {
            PermutationPreset::None => 0,
            PermutationPreset::Nine => 9,
            PermutationPreset::NinetyNine => 99,
            PermutationPreset::NineHundredNinetyNine => 999,
        }
    }

    /// User-facing label
    pub fn label(&self) -> &'static str {
        match self {
            PermutationPreset::None => "0 Permutations (No Confidence Envelope)",
            PermutationPreset::Nine => "9 Permutations",
            PermutationPreset::NinetyNine => "99 Permutations",
            PermutationPreset::NineHundredNinetyNine => "999 Permutations",
        }
    }

    /// Preset with exactly this count
    pub fn from_count(count: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.count() == count)
    }
}

impl fmt::Display for PermutationPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.beginning_distance, 0.0);
        assert_eq!(config.distance_increment, 1000.0);
        assert_eq!(config.band_count, None);
        assert_eq!(config.snap_distance, 25.0);
        assert_eq!(config.permutations, 0);
        assert_eq!(config.min_successful_trials, 1);
        assert!(config.parallel);
        assert!(!config.keep_trial_distances);
        assert_eq!(config.envelope_mode(), EnvelopeMode::MinMax);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(AnalysisConfig::quick().permutations, 9);
        assert_eq!(AnalysisConfig::thorough().permutations, 999);
        assert!(AnalysisConfig::thorough().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AnalysisConfig::from_toml(
            r#"
            distance_increment = 250.0
            permutations = 99

            [envelope_mode]
            mode = "percentile"
            lower = 2.5
            upper = 97.5
            "#,
        )
        .unwrap();
        assert_eq!(config.distance_increment, 250.0);
        assert_eq!(config.permutations, 99);
        assert_eq!(config.snap_distance, 25.0);
        assert_eq!(
            config.envelope_mode(),
            EnvelopeMode::Percentile { lower: 2.5, upper: 97.5 }
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AnalysisConfig {
            band_count: Some(12),
            seed: Some(7),
            ..AnalysisConfig::quick()
        };
        let parsed = AnalysisConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_increment_rejected() {
        let config = AnalysisConfig {
            distance_increment: 0.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::Domain(_))));
    }

    #[test]
    fn test_min_trials_above_permutations_rejected() {
        let config = AnalysisConfig {
            permutations: 9,
            min_successful_trials: 10,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn test_bad_percentiles_rejected() {
        let config = AnalysisConfig {
            envelope_mode: EnvelopeSetting::Percentile { lower: 90.0, upper: 10.0 },
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = AnalysisConfig {
            threads: Some(0),
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_permutation_preset_labels() {
        assert_eq!(
            PermutationPreset::None.label(),
            "0 Permutations (No Confidence Envelope)"
        );
        assert_eq!(PermutationPreset::from_count(99), Some(PermutationPreset::NinetyNine));
        assert_eq!(PermutationPreset::from_count(50), None);
        assert_eq!(PermutationPreset::NineHundredNinetyNine.to_string(), "999 Permutations");
    }
}
