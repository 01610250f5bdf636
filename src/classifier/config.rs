use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::model::Spectrum;
use crate::error::{ConfigError, Result};
use crate::rules::{ClassifierRuleSet, RuleSetConfig};
use crate::spectral::FilterRules;

/// Configuration schema version understood by this build.
pub const CONFIG_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Parameter groups
// ---------------------------------------------------------------------------

/// Near-zero guard that turns empty readings into a blank label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlankGuard {
    pub threshold: f64,
    /// Also short-circuit when the first sample is below `threshold`.
    pub inspect_first_sample: bool,
}

impl Default for BlankGuard {
    fn default() -> Self {
        Self {
            threshold: 1e-6,
            inspect_first_sample: false,
        }
    }
}

impl BlankGuard {
    pub fn is_blank(&self, spectrum: &Spectrum) -> bool {
        let Some(&first) = spectrum.intensity().first() else {
            return true;
        };
        // `!(x >= t)` so NaN readings count as blank too
        let mean_low = !(spectrum.mean_intensity() >= self.threshold);
        let first_low = self.inspect_first_sample && !(first >= self.threshold);
        mean_low || first_low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionParams {
    /// Neighbours compared on each side of a candidate maximum.
    pub window: usize,
    /// Trailing samples searched for the extra edge maximum.
    pub edge_segment: usize,
}

impl Default for ExtractionParams {
    fn default() -> Self {
        Self {
            window: 10,
            edge_segment: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineParams {
    pub degree: usize,
    /// Trailing samples holding the instrument start-up transient.
    pub exclude_last_n: usize,
}

impl Default for BaselineParams {
    fn default() -> Self {
        Self {
            degree: 5,
            exclude_last_n: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// ClassifierConfig
// ---------------------------------------------------------------------------

/// Every tunable of the classification engine in one versioned document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub blank: BlankGuard,
    #[serde(default)]
    pub extraction: ExtractionParams,
    #[serde(default)]
    pub baseline: BaselineParams,
    #[serde(default)]
    pub filter: FilterRules,
    pub rules: RuleSetConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        super::presets::standard()
    }
}

impl ClassifierConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Check every parameter and build the rule set.
    pub fn validate(&self) -> Result<ClassifierRuleSet> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                expected: CONFIG_VERSION,
            });
        }
        if !self.blank.threshold.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "blank.threshold",
                value: self.blank.threshold,
            });
        }
        if self.extraction.window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.extraction.edge_segment < self.extraction.window {
            return Err(ConfigError::EdgeSegmentTooShort {
                edge_segment: self.extraction.edge_segment,
                window: self.extraction.window,
            });
        }
        self.filter.validate()?;
        ClassifierRuleSet::from_config(&self.rules)
    }
}
