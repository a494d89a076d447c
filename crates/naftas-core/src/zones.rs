use serde::Serialize;

use crate::geo::Coordinate;

/// Coarse price area used when the caller does not name a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Norte,
    Sur,
    #[default]
    Este,
    Oeste,
}

impl Zone {
    /// Case-insensitive; anything unrecognized falls back to [`Zone::Este`].
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "norte" => Zone::Norte,
            "sur" => Zone::Sur,
            "oeste" => Zone::Oeste,
            _ => Zone::Este,
        }
    }

    /// Point the station search is centred on (Salta, Neuquén, Bariloche,
    /// Buenos Aires).
    #[must_use]
    pub fn anchor(self) -> Coordinate {
        match self {
            Zone::Norte => Coordinate::new(-24.790_997_533_553_384, -65.420_150_372_228_95),
            Zone::Sur => Coordinate::new(-39.024_968_201_063_67, -67.575_940_848_015_58),
            Zone::Oeste => Coordinate::new(-41.137_601_922_731_25, -71.301_805_405_230_81),
            Zone::Este => Coordinate::new(-34.573_060, -58.422_024),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Norte => "norte",
            Zone::Sur => "sur",
            Zone::Este => "este",
            Zone::Oeste => "oeste",
        }
    }
}
