use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::Classification;
use crate::data::model::{MetadataValue, Spectrum};
use crate::rules::Label;
use crate::spectral::{Curve, Peaks};

/// Reporting hook called with the final result of each classification.
///
/// Observers only see results; the label never depends on them.
pub trait ClassificationObserver {
    fn observe(&mut self, spectrum: &Spectrum, outcome: &Classification);
}

/// Logs every classification at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ClassificationObserver for LogObserver {
    fn observe(&mut self, spectrum: &Spectrum, outcome: &Classification) {
        let axes: Vec<String> = outcome.peaks.iter().map(|p| format!("{:.0}", p.axis)).collect();
        log::debug!(
            "{}: {} (peaks [{}], {} raw)",
            spectrum.name().unwrap_or("<unnamed>"),
            outcome.label,
            axes.join(", "),
            outcome.raw_peak_count
        );
    }
}

// ---------------------------------------------------------------------------
// JSON report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReportRecord {
    pub name: Option<String>,
    pub label: Label,
    pub blank: bool,
    pub raw_peak_count: usize,
    pub peaks: Peaks,
    pub baseline: Curve,
    pub metadata: BTreeMap<String, MetadataValue>,
}

/// Collects one [`ReportRecord`] per classification for a JSON report.
#[derive(Debug, Default, Clone)]
pub struct ReportCollector {
    records: Vec<ReportRecord>,
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ReportRecord] {
        &self.records
    }

    /// Number of spectra per label.
    pub fn label_counts(&self) -> BTreeMap<Label, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.label).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.records).context("serialising report")
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let text = self.to_json()?;
        std::fs::write(path, text).with_context(|| format!("writing report to {}", path.display()))
    }
}

impl ClassificationObserver for ReportCollector {
    fn observe(&mut self, spectrum: &Spectrum, outcome: &Classification) {
        self.records.push(ReportRecord {
            name: spectrum.name().map(str::to_string),
            label: outcome.label,
            blank: outcome.blank,
            raw_peak_count: outcome.raw_peak_count,
            peaks: outcome.peaks.clone(),
            baseline: outcome.baseline.clone(),
            metadata: spectrum.metadata().clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::Peak;

    fn outcome(label: Label) -> Classification {
        Classification {
            label,
            blank: false,
            raw_peak_count: 3,
            peaks: Peaks::from_vec(vec![Peak::new(1460.0, 0.1)]),
            baseline: Curve::Zero,
        }
    }

    #[test]
    fn collector_counts_labels_and_serialises() {
        let sp = Spectrum::new(vec![1.0], vec![0.0]).unwrap().with_name("bottle-1");
        let mut collector = ReportCollector::new();
        collector.observe(&sp, &outcome(Label::Hdpe));
        collector.observe(&sp, &outcome(Label::Hdpe));
        collector.observe(&sp, &outcome(Label::Pet));

        let counts = collector.label_counts();
        assert_eq!(counts[&Label::Hdpe], 2);
        assert_eq!(counts[&Label::Pet], 1);

        let json: serde_json::Value = serde_json::from_str(&collector.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["name"], "bottle-1");
        assert_eq!(json[0]["label"], "HDPE");
        assert_eq!(json[0]["peaks"][0]["axis"], 1460.0);
        assert_eq!(json[0]["baseline"]["kind"], "zero");
    }
}
