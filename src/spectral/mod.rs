/// Spectral feature extraction.
///
/// ```text
///   Spectrum
///      │
///      ├──────────────┐
///      ▼              ▼
///   ┌────────┐   ┌──────────┐
///   │ peaks  │   │ baseline │  polynomial least squares
///   └────────┘   └──────────┘
///      │              │
///      ▼              ▼
///   ┌──────────────────────┐
///   │        filter        │  amplitude / dead band / baseline criteria
///   └──────────────────────┘
///      │
///      ▼
///   filtered Peaks → rules
/// ```

pub mod baseline;
pub mod filter;
pub mod peaks;

pub use baseline::{BaselineEstimator, Curve};
pub use filter::{DeadBand, FilterRules, MeanReference, Rejection};
pub use peaks::{Peak, PeakExtractor, Peaks};
