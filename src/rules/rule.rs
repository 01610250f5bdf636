use serde::{Deserialize, Serialize};

use super::band::Band;
use crate::error::{ConfigError, Result};
use crate::spectral::Peaks;

/// Declarative peak-pattern predicate.
///
/// Primitive tests look at band membership; `all`, `any` and `not` combine
/// them. Evaluation is a pure function of the peak set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Some peak is accepted by `band`.
    Present { band: Band },
    /// At least `min` of `bands` are hit (each band counts once).
    CountAtLeast { bands: Vec<Band>, min: usize },
    /// No peak past `above` is more intense than `max_intensity`.
    Absent { above: f64, max_intensity: f64 },
    /// The strongest peak of `target` beats the strongest of every rival
    /// band and stays below `cap`. Rival bands without peaks don't compete.
    Strongest {
        target: Band,
        rivals: Vec<Band>,
        cap: f64,
    },
    /// Nothing survived filtering.
    NoPeaks,
    All { rules: Vec<Rule> },
    Any { rules: Vec<Rule> },
    Not { rule: Box<Rule> },
}

impl Rule {
    pub fn present(band: Band) -> Self {
        Rule::Present { band }
    }

    pub fn count_at_least(min: usize, bands: Vec<Band>) -> Self {
        Rule::CountAtLeast { bands, min }
    }

    pub fn absent(above: f64, max_intensity: f64) -> Self {
        Rule::Absent {
            above,
            max_intensity,
        }
    }

    pub fn strongest(target: Band, rivals: Vec<Band>, cap: f64) -> Self {
        Rule::Strongest {
            target,
            rivals,
            cap,
        }
    }

    pub fn no_peaks() -> Self {
        Rule::NoPeaks
    }

    pub fn all(rules: Vec<Rule>) -> Self {
        Rule::All { rules }
    }

    pub fn any(rules: Vec<Rule>) -> Self {
        Rule::Any { rules }
    }

    pub fn negate(rule: Rule) -> Self {
        Rule::Not {
            rule: Box::new(rule),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Rule::Present { .. } => "present",
            Rule::CountAtLeast { .. } => "count_at_least",
            Rule::Absent { .. } => "absent",
            Rule::Strongest { .. } => "strongest",
            Rule::NoPeaks => "no_peaks",
            Rule::All { .. } => "all",
            Rule::Any { .. } => "any",
            Rule::Not { .. } => "not",
        }
    }

    pub fn matches(&self, peaks: &Peaks) -> bool {
        match self {
            Rule::Present { band } => band.is_hit(peaks),
            Rule::CountAtLeast { bands, min } => {
                bands.iter().filter(|band| band.is_hit(peaks)).count() >= *min
            }
            Rule::Absent {
                above,
                max_intensity,
            } => peaks
                .iter()
                .filter(|p| p.axis > *above)
                .all(|p| p.intensity <= *max_intensity),
            Rule::Strongest {
                target,
                rivals,
                cap,
            } => {
                let Some(best) = target.strongest(peaks) else {
                    return false;
                };
                best.intensity < *cap
                    && rivals.iter().all(|rival| {
                        rival
                            .strongest(peaks)
                            .map_or(true, |r| best.intensity > r.intensity)
                    })
            }
            Rule::NoPeaks => peaks.is_empty(),
            Rule::All { rules } => rules.iter().all(|r| r.matches(peaks)),
            Rule::Any { rules } => rules.iter().any(|r| r.matches(peaks)),
            Rule::Not { rule } => !rule.matches(peaks),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Rule::Present { band } => band.validate(),
            Rule::CountAtLeast { bands, min } => {
                if bands.is_empty() {
                    return Err(ConfigError::EmptyOperands {
                        rule: "count_at_least",
                    });
                }
                if *min == 0 || *min > bands.len() {
                    return Err(ConfigError::CountOutOfRange {
                        min: *min,
                        bands: bands.len(),
                    });
                }
                bands.iter().try_for_each(Band::validate)
            }
            Rule::Absent {
                above,
                max_intensity,
            } => {
                finite("absent.above", *above)?;
                finite("absent.max_intensity", *max_intensity)
            }
            Rule::Strongest {
                target,
                rivals,
                cap,
            } => {
                if rivals.is_empty() {
                    return Err(ConfigError::EmptyOperands { rule: "strongest" });
                }
                finite("strongest.cap", *cap)?;
                target.validate()?;
                rivals.iter().try_for_each(Band::validate)
            }
            Rule::All { rules } | Rule::Any { rules } => {
                if rules.is_empty() {
                    return Err(ConfigError::EmptyOperands { rule: self.kind() });
                }
                rules.iter().try_for_each(Rule::validate)
            }
            Rule::NoPeaks => Ok(()),
            Rule::Not { rule } => rule.validate(),
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::Peak;

    fn peaks(points: &[(f64, f64)]) -> Peaks {
        points.iter().map(|&(a, i)| Peak::new(a, i)).collect()
    }

    fn ps_bands() -> Vec<Band> {
        vec![
            Band::between(1430.0, 1470.0),
            Band::between(1470.0, 1510.0),
            Band::between(1580.0, 1620.0),
            Band::between(2900.0, 2940.0),
            Band::between(3000.0, 3050.0),
        ]
    }

    #[test]
    fn count_counts_bands_not_peaks() {
        let rule = Rule::count_at_least(2, ps_bands());
        // two peaks, same band
        assert!(!rule.matches(&peaks(&[(1440.0, 0.3), (1450.0, 0.3)])));
        assert!(rule.matches(&peaks(&[(1440.0, 0.3), (1600.0, 0.3)])));
    }

    #[test]
    fn four_of_five() {
        let rule = Rule::count_at_least(4, ps_bands());
        let three = peaks(&[(1450.0, 0.3), (1490.0, 0.3), (1600.0, 0.3)]);
        assert!(!rule.matches(&three));
        let four = peaks(&[(1450.0, 0.3), (1490.0, 0.3), (1600.0, 0.3), (3020.0, 0.3)]);
        assert!(rule.matches(&four));
    }

    #[test]
    fn absent_rules_out_high_wavenumber_activity() {
        let rule = Rule::absent(3100.0, 0.2);
        assert!(rule.matches(&peaks(&[(2900.0, 0.9), (3200.0, 0.1)])));
        assert!(!rule.matches(&peaks(&[(3300.0, 0.5)])));
        assert!(rule.matches(&Peaks::new()));
    }

    #[test]
    fn strongest_requires_domination_below_cap() {
        let rule = Rule::strongest(
            Band::between(1200.0, 1300.0),
            vec![Band::between(1400.0, 1500.0), Band::between(2800.0, 3000.0)],
            1.5,
        );
        assert!(rule.matches(&peaks(&[(1250.0, 0.8), (1450.0, 0.5), (2900.0, 0.6)])));
        assert!(!rule.matches(&peaks(&[(1250.0, 0.8), (1450.0, 0.9)])));
        // equal intensity does not dominate
        assert!(!rule.matches(&peaks(&[(1250.0, 0.8), (2900.0, 0.8)])));
        // above the cap
        assert!(!rule.matches(&peaks(&[(1250.0, 1.6)])));
        // nothing in the target band
        assert!(!rule.matches(&peaks(&[(1450.0, 0.3)])));
    }

    #[test]
    fn combinators() {
        let a = Rule::present(Band::between(1700.0, 1800.0));
        let b = Rule::present(Band::between(1200.0, 1300.0));
        let set = peaks(&[(1720.0, 0.4)]);
        assert!(Rule::any(vec![a.clone(), b.clone()]).matches(&set));
        assert!(!Rule::all(vec![a.clone(), b.clone()]).matches(&set));
        assert!(Rule::negate(b).matches(&set));
    }

    #[test]
    fn nothing_matches_an_empty_peak_set_except_negations() {
        let empty = Peaks::new();
        assert!(!Rule::present(Band::between(1.0, 2.0)).matches(&empty));
        assert!(!Rule::count_at_least(1, ps_bands()).matches(&empty));
    }

    #[test]
    fn no_peaks_only_matches_an_empty_set() {
        assert!(Rule::no_peaks().matches(&Peaks::new()));
        assert!(!Rule::no_peaks().matches(&peaks(&[(1720.0, 0.01)])));
        assert!(Rule::no_peaks().validate().is_ok());
    }

    #[test]
    fn validation() {
        assert!(matches!(
            Rule::count_at_least(6, ps_bands()).validate(),
            Err(ConfigError::CountOutOfRange { min: 6, bands: 5 })
        ));
        assert!(matches!(
            Rule::count_at_least(0, ps_bands()).validate(),
            Err(ConfigError::CountOutOfRange { .. })
        ));
        assert!(matches!(
            Rule::all(Vec::new()).validate(),
            Err(ConfigError::EmptyOperands { rule: "all" })
        ));
        let nested = Rule::negate(Rule::present(Band::between(5.0, 1.0)));
        assert!(matches!(nested.validate(), Err(ConfigError::InvalidBand { .. })));
    }
}
