//! Normalized price records, independent of the upstream format.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geo::{Coordinate, Located};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// The date a price became valid ("fecha de vigencia").
///
/// Keeps the upstream text so responses echo exactly what the dataset
/// published. Equality and ordering only look at the parsed instant.
#[derive(Debug, Clone)]
pub struct EffectiveDate {
    raw: String,
    at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized effective date: {0:?}")]
pub struct InvalidDate(pub String);

impl EffectiveDate {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn naive(&self) -> NaiveDateTime {
        self.at
    }

    /// Milliseconds since the Unix epoch, reading the timestamp as UTC.
    #[must_use]
    pub fn epoch_millis(&self) -> i64 {
        self.at.and_utc().timestamp_millis()
    }
}

impl FromStr for EffectiveDate {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(InvalidDate(s.to_owned()));
        }

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self {
                raw: raw.to_owned(),
                at: with_offset.naive_utc(),
            });
        }

        let parsed = DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| InvalidDate(s.to_owned()))?;

        Ok(Self {
            raw: raw.to_owned(),
            at: parsed,
        })
    }
}

impl fmt::Display for EffectiveDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for EffectiveDate {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at
    }
}

impl Eq for EffectiveDate {}

impl PartialOrd for EffectiveDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EffectiveDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at)
    }
}

impl Serialize for EffectiveDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for EffectiveDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One published price for one fuel at one station.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub locality: String,
    pub brand: String,
    pub fuel_type_code: u32,
    pub price: Decimal,
    pub effective_date: EffectiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Located for PriceRecord {
    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> EffectiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn parses_plain_date() {
        let d = date("2024-02-01");
        assert_eq!(d.as_str(), "2024-02-01");
        assert_eq!(d.naive().to_string(), "2024-02-01 00:00:00");
    }

    #[test]
    fn parses_datastore_timestamp() {
        let d = date("2024-02-01T10:30:00");
        assert_eq!(d.naive().to_string(), "2024-02-01 10:30:00");
    }

    #[test]
    fn parses_csv_timestamp_with_space() {
        let d = date("2024-02-01 10:30:00");
        assert_eq!(d.naive().to_string(), "2024-02-01 10:30:00");
    }

    #[test]
    fn parses_rfc3339_as_utc() {
        let d = date("2024-02-01T10:30:00-03:00");
        assert_eq!(d.naive().to_string(), "2024-02-01 13:30:00");
    }

    #[test]
    fn parses_day_first_format() {
        let d = date("01/02/2024 08:00");
        assert_eq!(d.naive().to_string(), "2024-02-01 08:00:00");
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert!("yesterday".parse::<EffectiveDate>().is_err());
        assert!("   ".parse::<EffectiveDate>().is_err());
    }

    #[test]
    fn ordering_uses_instant_not_text() {
        assert!(date("2024-01-31T23:59:59") < date("2024-02-01"));
        assert_eq!(date("2024-02-01"), date("2024-02-01T00:00:00"));
    }

    #[test]
    fn epoch_millis_of_known_date() {
        assert_eq!(date("1970-01-02").epoch_millis(), 86_400_000);
    }

    #[test]
    fn serializes_as_original_text() {
        let json = serde_json::to_string(&date("2024-02-01")).unwrap();
        assert_eq!(json, "\"2024-02-01\"");
    }
}
