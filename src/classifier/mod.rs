/// Classification orchestration.
///
/// ```text
///   Spectrum ──► blank guard ──► Blank
///      │
///      ▼
///   baseline fit ─► local maxima ─► + edge maximum ─► filter ─► rule set ─► Label
/// ```
///
/// The steps always run in this order; each call is a pure function of the
/// spectrum and the immutable configuration.

pub mod config;
pub mod observer;
pub mod presets;

use std::collections::BTreeMap;

use crate::data::model::{SpectralDataset, Spectrum};
use crate::error::Result;
use crate::rules::{ClassifierRuleSet, Label};
use crate::spectral::{filter, BaselineEstimator, Curve, PeakExtractor, Peaks};

pub use config::{BaselineParams, BlankGuard, ClassifierConfig, ExtractionParams, CONFIG_VERSION};
pub use observer::{ClassificationObserver, LogObserver, ReportCollector, ReportRecord};

/// Identifier of a sensing channel on the sorting line.
pub type ChannelId = u32;

/// One sensor reading handed over by the sorting harness.
#[derive(Debug, Clone)]
pub struct SensorOutput {
    pub spectrum: Spectrum,
}

/// Full outcome of one classification call.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: Label,
    /// The near-zero guard short-circuited the pipeline.
    pub blank: bool,
    /// Maxima found before filtering, edge maximum included.
    pub raw_peak_count: usize,
    /// Peaks the rules were evaluated against.
    pub peaks: Peaks,
    pub baseline: Curve,
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Spectrum → label engine. Immutable after construction, so one instance
/// can be shared between threads.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassifierConfig,
    rules: ClassifierRuleSet,
    extractor: PeakExtractor,
    estimator: BaselineEstimator,
}

impl Classifier {
    /// Validate `config` and build the engine. Configuration defects fail here.
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        let rules = config.validate()?;
        log::info!(
            "classifier '{}' ready with {} rules (default {})",
            config.name,
            rules.entries().len(),
            rules.default_label()
        );
        let extractor = PeakExtractor::new(config.extraction.window, config.extraction.edge_segment);
        let estimator = BaselineEstimator::new(config.baseline.degree, config.baseline.exclude_last_n);
        Ok(Self {
            config,
            rules,
            extractor,
            estimator,
        })
    }

    pub fn from_preset(name: &str) -> Result<Self> {
        Self::new(presets::by_name(name)?)
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn rules(&self) -> &ClassifierRuleSet {
        &self.rules
    }

    pub fn classify_spectrum(&self, spectrum: &Spectrum) -> Label {
        self.classify_detailed(spectrum).label
    }

    pub fn classify_detailed(&self, spectrum: &Spectrum) -> Classification {
        let name = spectrum.name().unwrap_or("<unnamed>");

        if self.config.blank.is_blank(spectrum) {
            log::debug!("{name}: no signal, classified as blank");
            return Classification {
                label: Label::Blank,
                blank: true,
                raw_peak_count: 0,
                peaks: Peaks::new(),
                baseline: Curve::Zero,
            };
        }

        let baseline = self.estimator.fit(spectrum);

        let raw = self.extractor.extract(spectrum);

        let retained = filter::filter(&raw, spectrum.mean_intensity(), &baseline, &self.config.filter);
        log::debug!(
            "{name}: {} of {} peaks retained after filtering",
            retained.len(),
            raw.len()
        );

        let label = self.rules.classify(&retained);
        Classification {
            label,
            blank: false,
            raw_peak_count: raw.len(),
            peaks: retained,
            baseline,
        }
    }

    /// Classify and hand the outcome to `observer`.
    pub fn classify_observed(
        &self,
        spectrum: &Spectrum,
        observer: &mut dyn ClassificationObserver,
    ) -> Label {
        let outcome = self.classify_detailed(spectrum);
        observer.observe(spectrum, &outcome);
        outcome.label
    }

    /// Sorting callback: one label per channel of a sampling tick.
    pub fn sort(&self, sensors_output: &BTreeMap<ChannelId, SensorOutput>) -> BTreeMap<ChannelId, Label> {
        sensors_output
            .iter()
            .map(|(&channel, output)| (channel, self.classify_spectrum(&output.spectrum)))
            .collect()
    }

    /// Classify every spectrum of `dataset`, in order, spreading the work
    /// over scoped threads.
    pub fn classify_dataset(&self, dataset: &SpectralDataset) -> Vec<Classification> {
        if dataset.is_empty() {
            return Vec::new();
        }
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let chunk = dataset.len().div_ceil(workers);

        std::thread::scope(|scope| {
            let handles: Vec<_> = dataset
                .spectra
                .chunks(chunk)
                .map(|spectra| {
                    scope.spawn(move || {
                        spectra
                            .iter()
                            .map(|sp| self.classify_detailed(sp))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }
}
