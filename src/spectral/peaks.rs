use serde::{Deserialize, Serialize};

use crate::data::model::Spectrum;

// ---------------------------------------------------------------------------
// Peak / Peaks
// ---------------------------------------------------------------------------

/// A sample picked out of a spectrum as a candidate absorbance peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub axis: f64,
    pub intensity: f64,
}

impl Peak {
    pub fn new(axis: f64, intensity: f64) -> Self {
        Self { axis, intensity }
    }
}

/// A peak set, kept sorted by axis value with no duplicate axis values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Peaks(Vec<Peak>);

impl Peaks {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Sort by axis value and drop repeated axis values (first one wins).
    pub fn from_vec(mut peaks: Vec<Peak>) -> Self {
        peaks.sort_by(|a, b| a.axis.total_cmp(&b.axis));
        peaks.dedup_by(|later, earlier| later.axis == earlier.axis);
        Self(peaks)
    }

    /// Insert a peak unless one with the same axis value is already present.
    /// Returns whether the set changed.
    pub fn insert(&mut self, peak: Peak) -> bool {
        match self.0.binary_search_by(|p| p.axis.total_cmp(&peak.axis)) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, peak);
                true
            }
        }
    }

    pub fn contains_axis(&self, axis: f64) -> bool {
        self.0.binary_search_by(|p| p.axis.total_cmp(&axis)).is_ok()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Peak> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Peak] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mean peak intensity, `None` for an empty set.
    pub fn mean_intensity(&self) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.iter().map(|p| p.intensity).sum::<f64>() / self.0.len() as f64)
    }
}

impl FromIterator<Peak> for Peaks {
    fn from_iter<I: IntoIterator<Item = Peak>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Peaks {
    type Item = &'a Peak;
    type IntoIter = std::slice::Iter<'a, Peak>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// PeakExtractor
// ---------------------------------------------------------------------------

/// Symmetric-window local maximum picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakExtractor {
    /// Neighbours compared on each side.
    pub window: usize,
    /// Number of trailing samples searched for the edge maximum.
    pub edge_segment: usize,
}

impl PeakExtractor {
    pub fn new(window: usize, edge_segment: usize) -> Self {
        Self {
            window,
            edge_segment,
        }
    }

    /// Local maxima plus the edge-segment maximum.
    pub fn extract(&self, spectrum: &Spectrum) -> Peaks {
        let mut peaks = local_maxima(spectrum, self.window);
        if let Some(edge) = edge_maximum(spectrum, self.edge_segment) {
            if peaks.insert(edge) {
                log::trace!(
                    "{}: edge maximum at {:.1} added",
                    spectrum.name().unwrap_or("<unnamed>"),
                    edge.axis
                );
            }
        }
        peaks
    }
}

/// Samples strictly greater than every other sample within `window`
/// positions on both sides. Samples without a full window on either side
/// are never reported.
pub fn local_maxima(spectrum: &Spectrum, window: usize) -> Peaks {
    let y = spectrum.intensity();
    let n = y.len();
    if window == 0 || n < 2 * window + 1 {
        return Peaks::new();
    }

    let peaks = (window..n - window)
        .filter(|&i| {
            let centre = y[i];
            (i - window..=i + window)
                .filter(|&j| j != i)
                .all(|j| centre > y[j])
        })
        .filter_map(|i| spectrum.sample(i))
        .map(|(axis, intensity)| Peak::new(axis, intensity))
        .collect::<Vec<_>>();

    // Already sorted and unique: indices are visited in axis order.
    Peaks(peaks)
}

/// Largest sample among the last `segment` samples. Ties go to the lowest
/// axis value.
pub fn edge_maximum(spectrum: &Spectrum, segment: usize) -> Option<Peak> {
    let n = spectrum.len();
    if segment == 0 || n == 0 {
        return None;
    }
    let start = n.saturating_sub(segment);
    let mut best: Option<Peak> = None;
    for i in start..n {
        let (axis, intensity) = spectrum.sample(i)?;
        if intensity.is_nan() {
            continue;
        }
        match best {
            Some(b) if intensity <= b.intensity => {}
            _ => best = Some(Peak::new(axis, intensity)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(y: &[f64]) -> Spectrum {
        let x = (0..y.len()).map(|i| 1000.0 + i as f64).collect();
        Spectrum::new(x, y.to_vec()).unwrap()
    }

    #[test]
    fn finds_isolated_maximum() {
        let mut y = vec![0.0; 30];
        y[15] = 1.0;
        let peaks = local_maxima(&spectrum(&y), 10);
        assert_eq!(peaks.as_slice(), &[Peak::new(1015.0, 1.0)]);
    }

    #[test]
    fn ignores_samples_without_full_window() {
        let mut y = vec![0.0; 30];
        y[5] = 1.0;
        y[25] = 1.0;
        assert!(local_maxima(&spectrum(&y), 10).is_empty());
    }

    #[test]
    fn plateau_is_not_a_peak() {
        let mut y = vec![0.0; 30];
        y[14] = 1.0;
        y[15] = 1.0;
        assert!(local_maxima(&spectrum(&y), 3).is_empty());
    }

    #[test]
    fn neighbouring_maxima_inside_window_keep_only_the_larger() {
        let mut y = vec![0.0; 40];
        y[15] = 0.5;
        y[20] = 0.8;
        let peaks = local_maxima(&spectrum(&y), 10);
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks.as_slice()[0].axis, 1020.0);
    }

    #[test]
    fn short_spectrum_yields_nothing() {
        assert!(local_maxima(&spectrum(&[0.0, 1.0, 0.0]), 10).is_empty());
    }

    #[test]
    fn edge_maximum_prefers_first_on_ties() {
        let mut y = vec![0.0; 30];
        y[26] = 0.4;
        y[28] = 0.4;
        let edge = edge_maximum(&spectrum(&y), 10).unwrap();
        assert_eq!(edge, Peak::new(1026.0, 0.4));
    }

    #[test]
    fn extract_deduplicates_edge_maximum() {
        let mut y = vec![0.0; 40];
        y[25] = 1.0;
        let extractor = PeakExtractor::new(10, 15);
        let peaks = extractor.extract(&spectrum(&y));
        assert_eq!(peaks.len(), 1);
        assert!(peaks.contains_axis(1025.0));
    }

    #[test]
    fn extract_appends_edge_maximum() {
        let mut y = vec![0.0; 40];
        y[15] = 1.0;
        y[38] = 0.3;
        let peaks = PeakExtractor::new(10, 10).extract(&spectrum(&y));
        let axes: Vec<f64> = peaks.iter().map(|p| p.axis).collect();
        assert_eq!(axes, vec![1015.0, 1038.0]);
    }

    #[test]
    fn peaks_from_vec_sorts_and_dedups() {
        let peaks = Peaks::from_vec(vec![
            Peak::new(3.0, 0.1),
            Peak::new(1.0, 0.2),
            Peak::new(3.0, 0.9),
        ]);
        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks.as_slice()[0].axis, 1.0);
        assert_eq!(peaks.as_slice()[1].intensity, 0.1);
        assert!((peaks.mean_intensity().unwrap() - 0.15).abs() < 1e-12);
    }
}
