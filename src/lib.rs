//! Rule-based FTIR plastic classification for sorting lines.
//!
//! A [`Classifier`] turns one absorbance [`Spectrum`] into a material
//! [`Label`]: blank guard, baseline fit, peak extraction, peak filtering and
//! an ordered rule set evaluated first-match-wins.

pub mod classifier;
pub mod data;
pub mod error;
pub mod rules;
pub mod spectral;

pub use classifier::{
    ChannelId, Classification, ClassificationObserver, Classifier, ClassifierConfig, LogObserver,
    ReportCollector, SensorOutput,
};
pub use data::model::{MetadataValue, SpectralDataset, Spectrum};
pub use error::{ConfigError, SpectrumError};
pub use rules::{Band, ClassifierRuleSet, Label, Rule};
pub use spectral::{Curve, FilterRules, Peak, Peaks};
