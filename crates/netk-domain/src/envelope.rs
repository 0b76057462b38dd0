//! Confidence envelope aggregation
//!
//! Simulated K curves (one per successful permutation trial) are reduced to a
//! per-band lower and upper bound. The observed curve is then judged against
//! those bounds band by band.

use crate::{DistanceBands, KFunctionError};
use std::fmt;

/// How per-band bounds are taken from the simulated values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EnvelopeMode {
    /// Minimum and maximum across trials (1st and Tth order statistics)
    #[default]
    MinMax,
    /// Nearest-rank percentiles, each in `[0, 100]`
    Percentile {
        /// Lower percentile
        lower: f64,
        /// Upper percentile
        upper: f64,
    },
}

impl EnvelopeMode {
    /// Check percentile ranges
    pub fn validate(&self) -> Result<(), KFunctionError> {
        if let EnvelopeMode::Percentile { lower, upper } = *self {
            for p in [lower, upper] {
                if !(0.0..=100.0).contains(&p) {
                    return Err(KFunctionError::invalid(
                        "envelope_percentile",
                        p,
                        "percentiles must lie in [0, 100]",
                    ));
                }
            }
            if lower > upper {
                return Err(KFunctionError::invalid(
                    "envelope_percentile",
                    format!("{}..{}", lower, upper),
                    "lower percentile must not exceed upper percentile",
                ));
            }
        }
        Ok(())
    }
}

/// Envelope bounds at one band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceEnvelope {
    /// Band boundary r
    pub distance_band: f64,
    /// Lower bound of simulated K(r)
    pub lower_bound: f64,
    /// Upper bound of simulated K(r)
    pub upper_bound: f64,
}

impl ConfidenceEnvelope {
    /// Judge an observed K(r) against this band's bounds
    pub fn classify(&self, observed: f64) -> Verdict {
        if observed > self.upper_bound {
            Verdict::Clustered
        } else if observed < self.lower_bound {
            Verdict::Dispersed
        } else {
            Verdict::Random
        }
    }
}

/// Reading of an observed K(r) against the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Observed above the upper bound
    Clustered,
    /// Observed inside the envelope
    Random,
    /// Observed below the lower bound
    Dispersed,
}

impl Verdict {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Clustered => "clustered",
            Verdict::Random => "random",
            Verdict::Dispersed => "dispersed",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduce simulated curves to per-band envelope bounds
///
/// `attempted` is the number of trials started and `required` the minimum
/// number that must have succeeded; fewer successful curves than
/// `max(required, 1)` is an [`KFunctionError::IncompleteEnvelope`].
///
/// # Examples
///
/// ```
/// use netk_domain::{DistanceBands, EnvelopeMode};
/// use netk_domain::envelope::build_envelope;
///
/// let bands = DistanceBands::from_boundaries(vec![10.0, 20.0]).unwrap();
/// let curves = vec![vec![1.0, 4.0], vec![3.0, 2.0], vec![2.0, 6.0]];
/// let envelope = build_envelope(&bands, &curves, EnvelopeMode::MinMax, 3, 1).unwrap();
/// assert_eq!((envelope[0].lower_bound, envelope[0].upper_bound), (1.0, 3.0));
/// assert_eq!((envelope[1].lower_bound, envelope[1].upper_bound), (2.0, 6.0));
/// ```
pub fn build_envelope(
    bands: &DistanceBands,
    curves: &[Vec<f64>],
    mode: EnvelopeMode,
    attempted: usize,
    required: usize,
) -> Result<Vec<ConfidenceEnvelope>, KFunctionError> {
    mode.validate()?;

    let required = required.max(1);
    if curves.len() < required {
        return Err(KFunctionError::IncompleteEnvelope {
            succeeded: curves.len(),
            required,
            attempted,
        });
    }

    if let Some(bad) = curves.iter().find(|c| c.len() != bands.len()) {
        return Err(KFunctionError::invalid(
            "curve",
            bad.len(),
            format!("simulated curves must have one value per band ({})", bands.len()),
        ));
    }

    let mut column = Vec::with_capacity(curves.len());
    let envelope = bands
        .iter()
        .enumerate()
        .map(|(band_idx, boundary)| {
            column.clear();
            column.extend(curves.iter().map(|curve| curve[band_idx]));
            column.sort_by(f64::total_cmp);

            let (lower_bound, upper_bound) = match mode {
                EnvelopeMode::MinMax => (column[0], column[column.len() - 1]),
                EnvelopeMode::Percentile { lower, upper } => {
                    (nearest_rank(&column, lower), nearest_rank(&column, upper))
                }
            };

            ConfidenceEnvelope {
                distance_band: boundary,
                lower_bound,
                upper_bound,
            }
        })
        .collect();

    Ok(envelope)
}

/// Nearest-rank percentile of an ascending, non-empty slice
fn nearest_rank(sorted: &[f64], percentile: f64) -> f64 {
    let rank = (percentile / 100.0 * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}
