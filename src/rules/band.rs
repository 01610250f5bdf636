use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::spectral::{Peak, Peaks};

/// Open axis interval `(lo, hi)` with an optional open intensity range.
/// `include_lo` turns it into the bucket `[lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lo: f64,
    pub hi: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub include_lo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_intensity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_intensity: Option<f64>,
}

impl Band {
    /// Checked constructor for an axis-only band.
    pub fn new(lo: f64, hi: f64) -> Result<Self> {
        let band = Self::between(lo, hi);
        band.validate()?;
        Ok(band)
    }

    /// Unchecked constructor, validated later by the rule set.
    pub fn between(lo: f64, hi: f64) -> Self {
        Self {
            lo,
            hi,
            include_lo: false,
            min_intensity: None,
            max_intensity: None,
        }
    }

    /// Also accept peaks exactly at `lo`.
    pub fn including_lo(mut self) -> Self {
        self.include_lo = true;
        self
    }

    /// Require intensity strictly above `min`.
    pub fn above(mut self, min: f64) -> Self {
        self.min_intensity = Some(min);
        self
    }

    /// Require intensity strictly below `max`.
    pub fn below(mut self, max: f64) -> Self {
        self.max_intensity = Some(max);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lo.is_finite() || !self.hi.is_finite() || self.lo >= self.hi {
            return Err(ConfigError::InvalidBand {
                lo: self.lo,
                hi: self.hi,
            });
        }
        for (field, value) in [
            ("band.min_intensity", self.min_intensity),
            ("band.max_intensity", self.max_intensity),
        ] {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if let (Some(min), Some(max)) = (self.min_intensity, self.max_intensity) {
            if min >= max {
                return Err(ConfigError::InvalidIntensityRange { min, max });
            }
        }
        Ok(())
    }

    /// Strictly inside `(lo, hi)`, or `[lo, hi)` with `include_lo`.
    pub fn contains_axis(&self, axis: f64) -> bool {
        let above_lo = axis > self.lo || (self.include_lo && axis == self.lo);
        above_lo && axis < self.hi
    }

    /// Inside the interval and, when configured, the intensity range.
    pub fn accepts(&self, peak: &Peak) -> bool {
        self.contains_axis(peak.axis)
            && self.min_intensity.map_or(true, |min| peak.intensity > min)
            && self.max_intensity.map_or(true, |max| peak.intensity < max)
    }

    /// At least one accepted peak.
    pub fn is_hit(&self, peaks: &Peaks) -> bool {
        peaks.iter().any(|p| self.accepts(p))
    }

    /// Most intense accepted peak; equal intensities go to the lowest axis.
    pub fn strongest(&self, peaks: &Peaks) -> Option<Peak> {
        peaks
            .iter()
            .filter(|p| self.accepts(p))
            .fold(None, |best: Option<Peak>, p| match best {
                Some(b) if p.intensity <= b.intensity => Some(b),
                _ => Some(*p),
            })
    }
}
