/// Material rules evaluated over a filtered peak set.

pub mod band;
pub mod label;
pub mod rule;
pub mod ruleset;

pub use band::Band;
pub use label::Label;
pub use rule::Rule;
pub use ruleset::{ClassifierRuleSet, RuleEntry, RuleSetConfig};
