use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Raised while building bands, rule sets and classifier configurations.
///
/// These indicate a deployment defect, so they surface at construction time
/// and never during classification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("band bounds must be finite with lo < hi, got ({lo}, {hi})")]
    InvalidBand { lo: f64, hi: f64 },

    #[error("band intensity range must satisfy min < max, got ({min}, {max})")]
    InvalidIntensityRange { min: f64, max: f64 },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("rule '{rule}' needs at least one operand")]
    EmptyOperands { rule: &'static str },

    #[error("count threshold {min} is outside 1..={bands} for a rule over {bands} bands")]
    CountOutOfRange { min: usize, bands: usize },

    #[error("extraction window must be at least 1")]
    ZeroWindow,

    #[error("edge segment ({edge_segment}) must be at least the window ({window})")]
    EdgeSegmentTooShort { edge_segment: usize, window: usize },

    #[error("unsupported configuration version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("reading configuration {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid configuration file: {0}")]
    Parse(String),

    #[error("writing configuration as TOML: {0}")]
    Serialize(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Spectrum construction errors
// ---------------------------------------------------------------------------

/// Raised when samples handed over by a sensing collaborator cannot form a
/// [`Spectrum`](crate::data::model::Spectrum).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectrumError {
    #[error("axis has {axis} values but intensity has {intensity}")]
    LengthMismatch { axis: usize, intensity: usize },

    #[error("axis value at index {index} is not finite")]
    NonFiniteAxis { index: usize },

    #[error("axis values must be strictly increasing (index {index})")]
    NotIncreasing { index: usize },
}
