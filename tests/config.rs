use rusty_sorter::classifier::presets;
use rusty_sorter::spectral::MeanReference;
use rusty_sorter::{Classifier, ClassifierConfig, ConfigError, Label, Spectrum};
use tempfile::TempDir;

const CUSTOM: &str = r#"
version = 1
name = "two-materials"

[filter]
mean_ratio = 1.0
mean_reference = "peak_set"
dead_bands = [{ lo = 2300.0, hi = 2400.0 }]

[rules]
default_label = "Blank"

[[rules.rules]]
label = "PET"
[rules.rules.rule]
kind = "all"
rules = [
    { kind = "present", band = { lo = 1700.0, hi = 1750.0 } },
    { kind = "present", band = { lo = 1230.0, hi = 1280.0 } },
]

[[rules.rules]]
label = "PVC"
[rules.rules.rule]
kind = "present"
band = { lo = 600.0, hi = 720.0, min_intensity = 0.2 }
"#;

fn spikes(points: &[(f64, f64)]) -> Spectrum {
    let axis: Vec<f64> = (600..=4000).map(f64::from).collect();
    let mut y = vec![0.0; axis.len()];
    for &(at, value) in points {
        y[(at - 600.0) as usize] = value;
    }
    Spectrum::new(axis, y).unwrap()
}

#[test]
fn custom_configuration_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("line.toml");
    std::fs::write(&path, CUSTOM).unwrap();

    let config = ClassifierConfig::from_file(&path).unwrap();
    assert_eq!(config.filter.mean_reference, MeanReference::PeakSet);
    assert_eq!(config.filter.upper_bound, 3900.0);
    assert_eq!(config.filter.baseline_start, 1800.0);
    assert_eq!(config.extraction.window, 10);

    let classifier = Classifier::new(config).unwrap();
    assert_eq!(classifier.rules().entries().len(), 2);
    assert_eq!(
        classifier.classify_spectrum(&spikes(&[(1720.0, 0.5), (1250.0, 0.5)])),
        Label::Pet
    );
    assert_eq!(classifier.classify_spectrum(&spikes(&[(700.0, 0.5)])), Label::Pvc);
    assert_eq!(classifier.classify_spectrum(&spikes(&[(700.0, 0.1)])), Label::Blank);
}

#[test]
fn filter_section_with_one_key_keeps_the_rest() {
    let text = CUSTOM.replace(
        "mean_reference = \"peak_set\"\ndead_bands = [{ lo = 2300.0, hi = 2400.0 }]\n",
        "",
    );
    assert!(!text.contains("dead_bands"));
    let config = ClassifierConfig::from_toml_str(&text).unwrap();
    assert_eq!(config.filter.mean_ratio, 1.0);
    assert_eq!(config.filter.upper_bound, 3900.0);
    assert_eq!(config.filter.dead_bands.len(), 1);
    assert_eq!(config.filter.baseline_start, 1800.0);
    assert_eq!(config.filter.mean_reference, MeanReference::Spectrum);
}

#[test]
fn missing_file_is_reported() {
    let err = ClassifierConfig::from_file("/nonexistent/line.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn malformed_band_fails_at_construction() {
    let text = CUSTOM.replace("lo = 600.0, hi = 720.0", "lo = 720.0, hi = 600.0");
    let config = ClassifierConfig::from_toml_str(&text).unwrap();
    assert!(matches!(
        Classifier::new(config),
        Err(ConfigError::InvalidBand { .. })
    ));
}

#[test]
fn presets_survive_a_file_round_trip() {
    let dir = TempDir::new().unwrap();
    for name in presets::NAMES {
        let path = dir.path().join(format!("{name}.toml"));
        let config = presets::by_name(name).unwrap();
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(ClassifierConfig::from_file(&path).unwrap(), config);
    }
}
