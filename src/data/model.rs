use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::SpectrumError;

// ---------------------------------------------------------------------------
// MetadataValue – a single cell in a metadata column
// ---------------------------------------------------------------------------

/// A dynamically-typed metadata value carried alongside a spectrum.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v:.4}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Spectrum – one captured absorbance curve
// ---------------------------------------------------------------------------

/// One absorbance curve over a strictly increasing spectral axis.
///
/// Immutable once captured: the samples are only reachable through slices.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    axis: Vec<f64>,
    intensity: Vec<f64>,
    name: Option<String>,
    metadata: BTreeMap<String, MetadataValue>,
}

impl Spectrum {
    /// Build a spectrum, requiring a strictly increasing, finite axis.
    pub fn new(axis: Vec<f64>, intensity: Vec<f64>) -> Result<Self, SpectrumError> {
        if axis.len() != intensity.len() {
            return Err(SpectrumError::LengthMismatch {
                axis: axis.len(),
                intensity: intensity.len(),
            });
        }
        if let Some(index) = axis.iter().position(|v| !v.is_finite()) {
            return Err(SpectrumError::NonFiniteAxis { index });
        }
        if let Some(index) = axis.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SpectrumError::NotIncreasing { index: index + 1 });
        }
        Ok(Self {
            axis,
            intensity,
            name: None,
            metadata: BTreeMap::new(),
        })
    }

    /// Like [`Spectrum::new`], but accepts an axis stored high → low (the
    /// usual FTIR export order) and reverses both vectors first.
    pub fn from_samples(mut axis: Vec<f64>, mut intensity: Vec<f64>) -> Result<Self, SpectrumError> {
        if axis.len() > 1 && axis[0] > axis[axis.len() - 1] {
            axis.reverse();
            intensity.reverse();
        }
        Self::new(axis, intensity)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, MetadataValue>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn axis(&self) -> &[f64] {
        &self.axis
    }

    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn metadata(&self) -> &BTreeMap<String, MetadataValue> {
        &self.metadata
    }

    /// `(axis_value, intensity)` of the sample at `index`.
    pub fn sample(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.axis.get(index)?, *self.intensity.get(index)?))
    }

    pub fn len(&self) -> usize {
        self.axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    /// Arithmetic mean of the intensities, `0.0` for an empty spectrum.
    pub fn mean_intensity(&self) -> f64 {
        if self.intensity.is_empty() {
            return 0.0;
        }
        self.intensity.iter().sum::<f64>() / self.intensity.len() as f64
    }
}

// ---------------------------------------------------------------------------
// SpectralDataset – a batch of spectra loaded from one file
// ---------------------------------------------------------------------------

/// A batch of spectra plus the metadata column names seen while loading.
#[derive(Debug, Clone, Default)]
pub struct SpectralDataset {
    /// All spectra (rows).
    pub spectra: Vec<Spectrum>,
    /// Ordered list of metadata column names (excludes x, y).
    pub column_names: Vec<String>,
}

impl SpectralDataset {
    /// Build the column index from the loaded spectra.
    pub fn from_spectra(spectra: Vec<Spectrum>) -> Self {
        let mut column_names: Vec<String> = spectra
            .iter()
            .flat_map(|sp| sp.metadata.keys().cloned())
            .collect();
        column_names.sort();
        column_names.dedup();
        SpectralDataset {
            spectra,
            column_names,
        }
    }

    /// Number of spectra.
    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_increasing_axis() {
        let err = Spectrum::new(vec![1.0, 2.0, 2.0], vec![0.0; 3]).unwrap_err();
        assert_eq!(err, SpectrumError::NotIncreasing { index: 2 });
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = Spectrum::new(vec![1.0, 2.0], vec![0.0]).unwrap_err();
        assert_eq!(err, SpectrumError::LengthMismatch { axis: 2, intensity: 1 });
    }

    #[test]
    fn from_samples_reverses_descending_axis() {
        let sp = Spectrum::from_samples(vec![3.0, 2.0, 1.0], vec![0.3, 0.2, 0.1]).unwrap();
        assert_eq!(sp.axis(), &[1.0, 2.0, 3.0]);
        assert_eq!(sp.intensity(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn mean_of_empty_spectrum_is_zero() {
        let sp = Spectrum::new(Vec::new(), Vec::new()).unwrap();
        assert!(sp.is_empty());
        assert_eq!(sp.mean_intensity(), 0.0);
    }

    #[test]
    fn dataset_collects_sorted_unique_columns() {
        let mut meta = BTreeMap::new();
        meta.insert("material".to_string(), MetadataValue::String("PS".into()));
        meta.insert("batch".to_string(), MetadataValue::Integer(1));
        let a = Spectrum::new(vec![1.0], vec![0.0]).unwrap().with_metadata(meta.clone());
        let b = Spectrum::new(vec![1.0], vec![0.0]).unwrap().with_metadata(meta);
        let ds = SpectralDataset::from_spectra(vec![a, b]);
        assert_eq!(ds.column_names, vec!["batch", "material"]);
        assert_eq!(ds.len(), 2);
    }
}
