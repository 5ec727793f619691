//! Weight units and conversion between them

use std::fmt;

use serde::{Deserialize, Serialize};

const KG_TO_LBS: f64 = 2.20462;
const LBS_TO_KG: f64 = 0.453592;

/// Display unit for every weight in the catalog and the live session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Kg,
    Lbs,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a weight between units.
///
/// Displayed weights are whole numbers, so a real conversion rounds to the
/// nearest integer. Converting to the same unit returns the value untouched.
pub fn convert(value: f64, from: Unit, to: Unit) -> f64 {
    let ratio = match (from, to) {
        (Unit::Kg, Unit::Lbs) => KG_TO_LBS,
        (Unit::Lbs, Unit::Kg) => LBS_TO_KG,
        _ => return value,
    };
    (value * ratio).round()
}
