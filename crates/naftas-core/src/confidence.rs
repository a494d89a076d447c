use chrono::NaiveDateTime;
use serde::Serialize;

use crate::records::EffectiveDate;

const LIMITED_AFTER_DAYS: i64 = 20;
const LOW_AFTER_DAYS: i64 = 75;

/// How much to trust a price given how long ago it was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    #[serde(rename = "Alta confiabilidad")]
    High,
    #[serde(rename = "Confiabilidad limitada")]
    Limited,
    #[serde(rename = "Baja confiabilidad")]
    Low,
}

impl Confidence {
    /// Classify a price dated `date` as seen at `now`. A missing date is
    /// treated as untrustworthy.
    #[must_use]
    pub fn classify(date: Option<&EffectiveDate>, now: NaiveDateTime) -> Self {
        let Some(date) = date else {
            return Confidence::Low;
        };
        let age_days = (now - date.naive()).num_days();
        if age_days >= LOW_AFTER_DAYS {
            Confidence::Low
        } else if age_days >= LIMITED_AFTER_DAYS {
            Confidence::Limited
        } else {
            Confidence::High
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Confidence::High => "Alta confiabilidad",
            Confidence::Limited => "Confiabilidad limitada",
            Confidence::Low => "Baja confiabilidad",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
