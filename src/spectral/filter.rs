use serde::{Deserialize, Serialize};

use super::baseline::Curve;
use super::peaks::{Peak, Peaks};
use crate::error::{ConfigError, Result};

// ---------------------------------------------------------------------------
// Filter configuration
// ---------------------------------------------------------------------------

/// Closed axis interval `[lo, hi]` whose peaks are always discarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadBand {
    pub lo: f64,
    pub hi: f64,
}

impl DeadBand {
    pub fn contains(&self, axis: f64) -> bool {
        axis >= self.lo && axis <= self.hi
    }
}

/// What the mean-relative amplitude threshold is measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeanReference {
    /// Mean intensity of the whole spectrum.
    #[default]
    Spectrum,
    /// Mean intensity of the unfiltered peak set, taken once before the pass.
    PeakSet,
}

/// Removal criteria for spurious maxima. A peak is dropped if any applies.
///
/// Keys missing from a configuration file keep their default. Axis limits
/// set to `inf` switch their criterion off, as does an empty `dead_bands`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRules {
    /// Peaks with a larger axis value are edge artifacts.
    pub upper_bound: f64,
    /// Regions dominated by unrelated absorption (atmospheric CO₂ and such).
    pub dead_bands: Vec<DeadBand>,
    /// Peaks below `mean_ratio × reference mean` are noise.
    pub mean_ratio: f64,
    pub mean_reference: MeanReference,
    /// Absolute intensity floor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_intensity: Option<f64>,
    /// Axis value after which the baseline comparison applies.
    pub baseline_start: f64,
    /// Peaks past `baseline_start` below `baseline_ratio × baseline` are drift.
    pub baseline_ratio: f64,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            upper_bound: 3900.0,
            dead_bands: vec![DeadBand {
                lo: 2300.0,
                hi: 2400.0,
            }],
            mean_ratio: 0.75,
            mean_reference: MeanReference::Spectrum,
            min_intensity: None,
            baseline_start: 1800.0,
            baseline_ratio: 2.7,
        }
    }
}

impl FilterRules {
    pub fn validate(&self) -> Result<()> {
        for band in &self.dead_bands {
            if !band.lo.is_finite() || !band.hi.is_finite() || band.lo >= band.hi {
                return Err(ConfigError::InvalidBand {
                    lo: band.lo,
                    hi: band.hi,
                });
            }
        }
        not_nan("filter.upper_bound", self.upper_bound)?;
        not_nan("filter.baseline_start", self.baseline_start)?;
        if let Some(value) = self.min_intensity {
            finite("filter.min_intensity", value)?;
        }
        non_negative("filter.mean_ratio", self.mean_ratio)?;
        non_negative("filter.baseline_ratio", self.baseline_ratio)?;
        Ok(())
    }

    /// Why `peak` would be dropped, if at all.
    pub fn rejection(&self, peak: &Peak, mean_threshold: f64, baseline: &Curve) -> Option<Rejection> {
        if peak.axis > self.upper_bound {
            return Some(Rejection::BeyondUpperBound);
        }
        if self.dead_bands.iter().any(|band| band.contains(peak.axis)) {
            return Some(Rejection::DeadBand);
        }
        if peak.intensity < mean_threshold {
            return Some(Rejection::BelowMean);
        }
        if self.min_intensity.is_some_and(|floor| peak.intensity < floor) {
            return Some(Rejection::BelowFloor);
        }
        if peak.axis > self.baseline_start
            && peak.intensity < self.baseline_ratio * baseline.evaluate(peak.axis)
        {
            return Some(Rejection::BelowBaseline);
        }
        None
    }
}

fn finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn not_nan(field: &'static str, value: f64) -> Result<()> {
    if value.is_nan() {
        Err(ConfigError::NotANumber { field })
    } else {
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

/// Reason a peak was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    BeyondUpperBound,
    DeadBand,
    BelowMean,
    BelowFloor,
    BelowBaseline,
}

// ---------------------------------------------------------------------------
// PeakFilter
// ---------------------------------------------------------------------------

/// Single pure pass: the threshold is fixed up front, the retained peaks are
/// collected into a new set and the input is left untouched.
pub fn filter(peaks: &Peaks, spectrum_mean: f64, baseline: &Curve, rules: &FilterRules) -> Peaks {
    let reference = match rules.mean_reference {
        MeanReference::Spectrum => spectrum_mean,
        MeanReference::PeakSet => peaks.mean_intensity().unwrap_or(0.0),
    };
    let mean_threshold = rules.mean_ratio * reference;

    peaks
        .iter()
        .filter(|peak| match rules.rejection(peak, mean_threshold, baseline) {
            Some(reason) => {
                log::trace!(
                    "dropping peak at {:.1} ({:.4}): {reason:?}",
                    peak.axis,
                    peak.intensity
                );
                false
            }
            None => true,
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_rules() -> FilterRules {
        FilterRules {
            upper_bound: f64::INFINITY,
            dead_bands: Vec::new(),
            mean_ratio: 0.0,
            mean_reference: MeanReference::Spectrum,
            min_intensity: None,
            baseline_start: f64::INFINITY,
            baseline_ratio: 0.0,
        }
    }

    fn peaks(points: &[(f64, f64)]) -> Peaks {
        points.iter().map(|&(a, i)| Peak::new(a, i)).collect()
    }

    fn axes(p: &Peaks) -> Vec<f64> {
        p.iter().map(|p| p.axis).collect()
    }

    #[test]
    fn drops_beyond_upper_bound() {
        let rules = FilterRules {
            upper_bound: 3900.0,
            ..bare_rules()
        };
        let out = filter(&peaks(&[(3800.0, 1.0), (3950.0, 1.0)]), 0.0, &Curve::Zero, &rules);
        assert_eq!(axes(&out), vec![3800.0]);
    }

    #[test]
    fn dead_band_drops_regardless_of_amplitude() {
        let rules = FilterRules {
            dead_bands: vec![DeadBand { lo: 2300.0, hi: 2400.0 }],
            ..bare_rules()
        };
        let out = filter(
            &peaks(&[(2350.0, 9.0), (2300.0, 9.0), (2450.0, 0.1)]),
            0.0,
            &Curve::Zero,
            &rules,
        );
        assert_eq!(axes(&out), vec![2450.0]);
    }

    #[test]
    fn mean_threshold_against_spectrum_mean() {
        let rules = FilterRules {
            mean_ratio: 0.75,
            ..bare_rules()
        };
        let out = filter(&peaks(&[(1000.0, 0.07), (1100.0, 0.08)]), 0.1, &Curve::Zero, &rules);
        assert_eq!(axes(&out), vec![1100.0]);
    }

    #[test]
    fn peak_set_mean_is_taken_once() {
        let rules = FilterRules {
            mean_ratio: 1.0,
            mean_reference: MeanReference::PeakSet,
            ..bare_rules()
        };
        // mean = 0.4; only 0.1 falls below it, 0.4 itself survives.
        let out = filter(
            &peaks(&[(1000.0, 0.1), (1100.0, 0.4), (1200.0, 0.7)]),
            0.0,
            &Curve::Zero,
            &rules,
        );
        assert_eq!(axes(&out), vec![1100.0, 1200.0]);
    }

    #[test]
    fn baseline_comparison_only_past_start() {
        let rules = FilterRules {
            baseline_start: 1800.0,
            baseline_ratio: 2.7,
            ..bare_rules()
        };
        let baseline = Curve::Polynomial {
            coefficients: vec![0.1],
            centre: 0.0,
            half_width: 1.0,
        };
        let out = filter(
            &peaks(&[(1500.0, 0.2), (2000.0, 0.2), (2100.0, 0.3)]),
            0.0,
            &baseline,
            &rules,
        );
        assert_eq!(axes(&out), vec![1500.0, 2100.0]);
    }

    #[test]
    fn absolute_floor() {
        let rules = FilterRules {
            min_intensity: Some(0.09),
            ..bare_rules()
        };
        let out = filter(&peaks(&[(1000.0, 0.05), (1100.0, 0.09)]), 0.0, &Curve::Zero, &rules);
        assert_eq!(axes(&out), vec![1100.0]);
    }

    #[test]
    fn idempotent_with_spectrum_reference() {
        let rules = FilterRules::default();
        let input = peaks(&[
            (1460.0, 0.1),
            (2350.0, 0.8),
            (2900.0, 0.5),
            (3000.0, 0.01),
            (3950.0, 0.3),
        ]);
        let once = filter(&input, 0.02, &Curve::Zero, &rules);
        let twice = filter(&once, 0.02, &Curve::Zero, &rules);
        assert_eq!(once, twice);
        assert_eq!(axes(&once), vec![1460.0, 2900.0]);
    }

    #[test]
    fn input_is_left_untouched() {
        let rules = FilterRules {
            min_intensity: Some(1.0),
            ..bare_rules()
        };
        let input = peaks(&[(1000.0, 0.5)]);
        let out = filter(&input, 0.0, &Curve::Zero, &rules);
        assert!(out.is_empty());
        assert_eq!(input.len(), 1);
    }

    #[test]
    fn validation_rejects_inverted_dead_band() {
        let rules = FilterRules {
            dead_bands: vec![DeadBand { lo: 2400.0, hi: 2300.0 }],
            ..bare_rules()
        };
        assert!(matches!(rules.validate(), Err(ConfigError::InvalidBand { .. })));
    }

    #[test]
    fn validation_rejects_negative_ratio() {
        let rules = FilterRules {
            mean_ratio: -1.0,
            ..bare_rules()
        };
        assert!(matches!(rules.validate(), Err(ConfigError::Negative { .. })));
    }

    #[test]
    fn validation_rejects_nan_bound() {
        let rules = FilterRules {
            upper_bound: f64::NAN,
            ..bare_rules()
        };
        assert!(matches!(rules.validate(), Err(ConfigError::NotANumber { .. })));
        assert!(bare_rules().validate().is_ok());
    }
}
