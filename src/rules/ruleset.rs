use serde::{Deserialize, Serialize};

use super::label::Label;
use super::rule::Rule;
use crate::error::Result;
use crate::spectral::Peaks;

// ---------------------------------------------------------------------------
// Serialisable form
// ---------------------------------------------------------------------------

/// One `(label, rule)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub label: Label,
    pub rule: Rule,
}

impl RuleEntry {
    pub fn new(label: Label, rule: Rule) -> Self {
        Self { label, rule }
    }
}

/// Unvalidated rule set as it appears in a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetConfig {
    /// Returned when no rule matches.
    pub default_label: Label,
    /// Evaluated top to bottom.
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

// ---------------------------------------------------------------------------
// ClassifierRuleSet
// ---------------------------------------------------------------------------

/// Ordered, validated `(label, rule)` list. The first matching rule wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierRuleSet {
    entries: Vec<RuleEntry>,
    default_label: Label,
}

impl ClassifierRuleSet {
    pub fn new(entries: Vec<RuleEntry>, default_label: Label) -> Result<Self> {
        for entry in &entries {
            entry.rule.validate()?;
        }
        Ok(Self {
            entries,
            default_label,
        })
    }

    pub fn from_config(config: &RuleSetConfig) -> Result<Self> {
        Self::new(config.rules.clone(), config.default_label)
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub fn default_label(&self) -> Label {
        self.default_label
    }

    /// Position of the first matching entry.
    pub fn first_match(&self, peaks: &Peaks) -> Option<usize> {
        self.entries.iter().position(|entry| entry.rule.matches(peaks))
    }

    pub fn classify(&self, peaks: &Peaks) -> Label {
        match self.first_match(peaks) {
            Some(index) => {
                let entry = &self.entries[index];
                log::debug!("rule #{index} ({}) matched: {}", entry.rule.kind(), entry.label);
                entry.label
            }
            None => {
                log::debug!("no rule matched; falling back to {}", self.default_label);
                self.default_label
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::rules::Band;
    use crate::spectral::Peak;

    fn peaks(points: &[(f64, f64)]) -> Peaks {
        points.iter().map(|&(a, i)| Peak::new(a, i)).collect()
    }

    #[test]
    fn first_matching_rule_wins() {
        let carbonyl = Rule::present(Band::between(1700.0, 1800.0));
        let ch_stretch = Rule::present(Band::between(2800.0, 3000.0));
        let set = ClassifierRuleSet::new(
            vec![
                RuleEntry::new(Label::Pp, ch_stretch.clone()),
                RuleEntry::new(Label::Polyester, carbonyl.clone()),
            ],
            Label::Blank,
        )
        .unwrap();
        let both = peaks(&[(1720.0, 0.5), (2900.0, 0.5)]);
        assert_eq!(set.classify(&both), Label::Pp);

        let swapped = ClassifierRuleSet::new(
            vec![
                RuleEntry::new(Label::Polyester, carbonyl),
                RuleEntry::new(Label::Pp, ch_stretch),
            ],
            Label::Blank,
        )
        .unwrap();
        assert_eq!(swapped.classify(&both), Label::Polyester);
    }

    #[test]
    fn empty_peak_set_gets_default_label() {
        let set = ClassifierRuleSet::new(
            vec![RuleEntry::new(
                Label::Pvc,
                Rule::present(Band::between(1200.0, 1300.0)),
            )],
            Label::Ps,
        )
        .unwrap();
        assert_eq!(set.classify(&Peaks::new()), Label::Ps);
        assert_eq!(set.first_match(&Peaks::new()), None);
    }

    #[test]
    fn construction_fails_on_malformed_band() {
        let err = ClassifierRuleSet::new(
            vec![RuleEntry::new(
                Label::Pvc,
                Rule::present(Band::between(1300.0, 1200.0)),
            )],
            Label::Blank,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidBand { lo: 1300.0, hi: 1200.0 });
    }
}
