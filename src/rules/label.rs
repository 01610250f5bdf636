use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Material identity assigned to one classification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Empty reading or nothing recognisable.
    Blank,
    #[serde(rename = "PET")]
    Pet,
    #[serde(rename = "HDPE")]
    Hdpe,
    #[serde(rename = "PVC")]
    Pvc,
    #[serde(rename = "LDPE")]
    Ldpe,
    #[serde(rename = "PP")]
    Pp,
    #[serde(rename = "PS")]
    Ps,
    #[serde(rename = "PC")]
    Pc,
    #[serde(rename = "PU")]
    Pu,
    Polyester,
}

impl Label {
    pub const ALL: [Label; 10] = [
        Label::Blank,
        Label::Pet,
        Label::Hdpe,
        Label::Pvc,
        Label::Ldpe,
        Label::Pp,
        Label::Ps,
        Label::Pc,
        Label::Pu,
        Label::Polyester,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Blank => "Blank",
            Label::Pet => "PET",
            Label::Hdpe => "HDPE",
            Label::Pvc => "PVC",
            Label::Ldpe => "LDPE",
            Label::Pp => "PP",
            Label::Ps => "PS",
            Label::Pc => "PC",
            Label::Pu => "PU",
            Label::Polyester => "Polyester",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    /// Case-insensitive; accepts "unknown" as an alias for blank.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("unknown") {
            return Ok(Label::Blank);
        }
        Label::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown material label '{s}'"))
    }
}
