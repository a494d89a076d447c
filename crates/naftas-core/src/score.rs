//! Brand "attractiveness" indicator.
//!
//! Combines how cheap a brand is against the board average with how fresh
//! its prices are against the board average update date:
//!
//! ```text
//! price  = clamp(50 + 2.5 * (avg - brand_avg) / avg * 100, 0, 100) * 0.6
//! recent = clamp(50 + 3.0 * (brand_date - avg_date) / 1 day, 0, 100) * 0.4
//! score  = price + recent            // always within [0, 100]
//! ```

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::aggregate::{BrandFuels, FuelPrice, PriceBoard};

const PRICE_WEIGHT: f64 = 0.6;
const RECENCY_WEIGHT: f64 = 0.4;
const PRICE_FACTOR: f64 = 2.5;
const DAY_FACTOR: f64 = 3.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Average price and average effective date across a whole board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalAverages {
    pub price: f64,
    /// Epoch milliseconds.
    pub effective_millis: f64,
}

impl GlobalAverages {
    /// `None` for an empty board.
    #[must_use]
    pub fn from_board(board: &PriceBoard) -> Option<Self> {
        averages(board.fuel_prices())
    }
}

#[allow(clippy::cast_precision_loss)]
fn averages<'a>(prices: impl Iterator<Item = &'a FuelPrice>) -> Option<GlobalAverages> {
    let mut count = 0usize;
    let mut price_sum = 0.0;
    let mut millis_sum = 0.0;

    for p in prices {
        price_sum += p.price.to_f64().unwrap_or(0.0);
        millis_sum += p.effective_date.epoch_millis() as f64;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let n = count as f64;
    Some(GlobalAverages {
        price: price_sum / n,
        effective_millis: millis_sum / n,
    })
}

/// Score one brand's fuels against the board averages.
///
/// Returns `None` when the brand has no fuels or the global average price
/// is zero, since neither ratio is defined then.
#[must_use]
pub fn attractiveness_score(fuels: &BrandFuels, global: &GlobalAverages) -> Option<f64> {
    if global.price == 0.0 || !global.price.is_finite() {
        return None;
    }
    let brand = averages(fuels.iter().map(|(_, p)| p))?;

    let price_diff_pct = (global.price - brand.price) / global.price * 100.0;
    let price_score = (50.0 + price_diff_pct * PRICE_FACTOR).clamp(0.0, 100.0) * PRICE_WEIGHT;

    let day_diff = (brand.effective_millis - global.effective_millis) / MILLIS_PER_DAY;
    let recency_score = (50.0 + day_diff * DAY_FACTOR).clamp(0.0, 100.0) * RECENCY_WEIGHT;

    Some(price_score + recency_score)
}

/// Coarse reading of a score for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
    Bad,
}

impl ScoreBand {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 50.0 {
            ScoreBand::Good
        } else if score >= 40.0 {
            ScoreBand::Fair
        } else if score >= 20.0 {
            ScoreBand::Poor
        } else {
            ScoreBand::Bad
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreBand::Good => write!(f, "good"),
            ScoreBand::Fair => write!(f, "fair"),
            ScoreBand::Poor => write!(f, "poor"),
            ScoreBand::Bad => write!(f, "bad"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::aggregate::{aggregate_prices, AggregateOptions};
    use crate::brands::BrandAllowList;
    use crate::records::PriceRecord;

    fn record(brand: &str, code: u32, price: i64, date: &str) -> PriceRecord {
        PriceRecord {
            locality: "X".to_owned(),
            brand: brand.to_owned(),
            fuel_type_code: code,
            price: Decimal::from(price),
            effective_date: date.parse().unwrap(),
            latitude: None,
            longitude: None,
        }
    }

    fn board(records: Vec<PriceRecord>) -> PriceBoard {
        aggregate_prices(records, &BrandAllowList::default(), AggregateOptions::default())
    }

    fn brand_score(board: &PriceBoard, brand: &str) -> f64 {
        let global = GlobalAverages::from_board(board).unwrap();
        attractiveness_score(&board.get("X").unwrap().brands[brand], &global).unwrap()
    }

    #[test]
    fn average_brand_scores_fifty() {
        let b = board(vec![
            record("YPF", 2, 1000, "2024-02-01"),
            record("AXION", 2, 1000, "2024-02-01"),
        ]);
        assert!((brand_score(&b, "YPF") - 50.0).abs() < 1e-9);
    }

    #[test]
    fn cheaper_brand_scores_higher() {
        let b = board(vec![
            record("YPF", 2, 900, "2024-02-01"),
            record("AXION", 2, 1100, "2024-02-01"),
        ]);
        // 10% under average: price part = (50 + 25) * 0.6 = 45, recency = 20.
        assert!((brand_score(&b, "YPF") - 65.0).abs() < 1e-9);
        assert!((brand_score(&b, "AXION") - 35.0).abs() < 1e-9);
    }

    #[test]
    fn fresher_brand_scores_higher() {
        let b = board(vec![
            record("YPF", 2, 1000, "2024-02-03"),
            record("AXION", 2, 1000, "2024-02-01"),
        ]);
        // One day newer than average: recency = (50 + 3) * 0.4 = 21.2.
        assert!((brand_score(&b, "YPF") - 51.2).abs() < 1e-9);
        assert!((brand_score(&b, "AXION") - 48.8).abs() < 1e-9);
    }

    #[test]
    fn extreme_inputs_stay_within_bounds() {
        let b = board(vec![
            record("YPF", 2, 1, "2000-01-01"),
            record("AXION", 2, 1_000_000, "2030-01-01"),
            record("PUMA", 2, 500, "2015-06-01"),
        ]);
        for brand in ["YPF", "AXION", "PUMA"] {
            let score = brand_score(&b, brand);
            assert!((0.0..=100.0).contains(&score), "{brand}: {score}");
        }
        // Cheapest but stalest: full price credit, no recency credit.
        assert!((brand_score(&b, "YPF") - 60.0).abs() < 1e-9);
        // Priciest but freshest: no price credit, full recency credit.
        assert!((brand_score(&b, "AXION") - 40.0).abs() < 1e-9);
    }

    #[test]
    fn zero_global_average_is_skipped() {
        let b = board(vec![record("YPF", 2, 1000, "2024-02-01")]);
        let global = GlobalAverages {
            price: 0.0,
            effective_millis: 0.0,
        };
        assert!(attractiveness_score(&b.get("X").unwrap().brands["YPF"], &global).is_none());
    }

    #[test]
    fn empty_brand_is_skipped() {
        let global = GlobalAverages {
            price: 1000.0,
            effective_millis: 0.0,
        };
        assert!(attractiveness_score(&BrandFuels::default(), &global).is_none());
    }

    #[test]
    fn empty_board_has_no_averages() {
        assert!(GlobalAverages::from_board(&PriceBoard::default()).is_none());
    }

    #[test]
    fn bands_match_thresholds() {
        assert_eq!(ScoreBand::from_score(75.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(50.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(45.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(20.0), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(19.9), ScoreBand::Bad);
    }
}
