//! Named calibrations.
//!
//! The field deployments disagree on several thresholds (mean ratio 0.75
//! against 1.2, LDPE intensity window starting at 0.25 or 0.22) and on rule
//! order. Each variant is kept here as a preset instead of being hard-coded.

use super::config::{
    BaselineParams, BlankGuard, ClassifierConfig, ExtractionParams, CONFIG_VERSION,
};
use crate::error::{ConfigError, Result};
use crate::rules::{Band, Label, Rule, RuleEntry, RuleSetConfig};
use crate::spectral::{FilterRules, MeanReference};

pub const NAMES: [&str; 3] = ["standard", "strict", "legacy"];

pub fn by_name(name: &str) -> Result<ClassifierConfig> {
    match name.trim().to_ascii_lowercase().as_str() {
        "standard" => Ok(standard()),
        "strict" => Ok(strict()),
        "legacy" => Ok(legacy()),
        _ => Err(ConfigError::UnknownPreset(name.to_string())),
    }
}

/// Mean ratio 0.75, LDPE between 0.25 and 0.45.
pub fn standard() -> ClassifierConfig {
    ClassifierConfig {
        version: CONFIG_VERSION,
        name: "standard".to_string(),
        blank: BlankGuard::default(),
        extraction: ExtractionParams::default(),
        baseline: BaselineParams::default(),
        filter: FilterRules::default(),
        rules: material_rules(0.25),
    }
}

/// Mean ratio 1.2, LDPE between 0.22 and 0.45.
pub fn strict() -> ClassifierConfig {
    ClassifierConfig {
        name: "strict".to_string(),
        filter: FilterRules {
            mean_ratio: 1.2,
            ..FilterRules::default()
        },
        rules: material_rules(0.22),
        ..standard()
    }
}

/// Fixed 0.09 intensity floor and hundred-wide bands, no baseline or dead
/// band criteria. A reading whose peaks all fall under the floor is PS.
pub fn legacy() -> ClassifierConfig {
    // hundred-wide buckets [lo, lo + 100)
    let band = |lo: f64| Rule::present(Band::between(lo, lo + 100.0).including_lo());
    let carbonyl = || band(1700.0);

    let rules = vec![
        RuleEntry::new(Label::Ps, Rule::no_peaks()),
        RuleEntry::new(
            Label::Hdpe,
            Rule::present(Band::between(2800.0, 2950.0).above(0.45)),
        ),
        RuleEntry::new(
            Label::Ldpe,
            Rule::present(Band::between(2800.0, 2950.0).above(0.25).below(0.45)),
        ),
        RuleEntry::new(
            Label::Pu,
            Rule::all(vec![carbonyl(), Rule::any(vec![band(1300.0), band(1200.0)])]),
        ),
        RuleEntry::new(Label::Pet, Rule::all(vec![carbonyl(), band(1400.0)])),
        RuleEntry::new(Label::Pc, Rule::all(vec![carbonyl(), band(1500.0)])),
        RuleEntry::new(Label::Pp, band(2900.0)),
        RuleEntry::new(Label::Polyester, carbonyl()),
        RuleEntry::new(Label::Pvc, band(1200.0)),
        RuleEntry::new(Label::Ps, band(1400.0)),
    ];

    ClassifierConfig {
        version: CONFIG_VERSION,
        name: "legacy".to_string(),
        blank: BlankGuard::default(),
        extraction: ExtractionParams::default(),
        baseline: BaselineParams::default(),
        filter: FilterRules {
            upper_bound: f64::INFINITY,
            dead_bands: Vec::new(),
            mean_ratio: 0.0,
            mean_reference: MeanReference::Spectrum,
            min_intensity: Some(0.09),
            baseline_start: f64::INFINITY,
            baseline_ratio: 0.0,
        },
        rules: RuleSetConfig {
            default_label: Label::Blank,
            rules,
        },
    }
}

fn material_rules(ldpe_floor: f64) -> RuleSetConfig {
    let present = |lo: f64, hi: f64| Rule::present(Band::between(lo, hi));
    let methylene_bend = || present(1450.0, 1480.0);
    let no_high_wavenumber_activity = || Rule::absent(3100.0, 0.3);

    let rules = vec![
        RuleEntry::new(
            Label::Ps,
            Rule::count_at_least(
                4,
                vec![
                    Band::between(1430.0, 1470.0),
                    Band::between(1470.0, 1510.0),
                    Band::between(1580.0, 1620.0),
                    Band::between(2900.0, 2940.0),
                    Band::between(3000.0, 3050.0),
                ],
            ),
        ),
        RuleEntry::new(
            Label::Pp,
            Rule::count_at_least(
                2,
                vec![
                    Band::between(1370.0, 1385.0),
                    Band::between(2940.0, 2960.0),
                    Band::between(2860.0, 2880.0),
                ],
            ),
        ),
        RuleEntry::new(
            Label::Hdpe,
            Rule::all(vec![
                methylene_bend(),
                Rule::present(Band::between(2850.0, 2950.0).above(0.45)),
                no_high_wavenumber_activity(),
            ]),
        ),
        RuleEntry::new(
            Label::Ldpe,
            Rule::all(vec![
                methylene_bend(),
                Rule::present(Band::between(2850.0, 2950.0).above(ldpe_floor).below(0.45)),
                no_high_wavenumber_activity(),
            ]),
        ),
        RuleEntry::new(
            Label::Pu,
            Rule::all(vec![
                present(1690.0, 1740.0),
                present(1520.0, 1560.0),
                present(3250.0, 3400.0),
            ]),
        ),
        RuleEntry::new(
            Label::Pet,
            Rule::all(vec![present(1700.0, 1750.0), present(1230.0, 1280.0)]),
        ),
        RuleEntry::new(
            Label::Pc,
            Rule::all(vec![present(1750.0, 1800.0), present(1490.0, 1520.0)]),
        ),
        RuleEntry::new(Label::Polyester, present(1700.0, 1800.0)),
        RuleEntry::new(
            Label::Pvc,
            Rule::strongest(
                Band::between(600.0, 720.0),
                vec![Band::between(1400.0, 1500.0), Band::between(2800.0, 3000.0)],
                2.0,
            ),
        ),
    ];

    RuleSetConfig {
        default_label: Label::Blank,
        rules,
    }
}
