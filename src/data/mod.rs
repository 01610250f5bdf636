/// Data layer: core types, file I/O and synthetic spectra.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SpectralDataset (ascending axes)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ SpectralDataset │  Vec<Spectrum>, metadata column names
///   └────────────────┘
///        ▲
///        │
///   ┌───────────┐
///   │ synthetic  │  Gaussian band models of each material
///   └───────────┘
/// ```

pub mod loader;
pub mod model;
pub mod synthetic;
