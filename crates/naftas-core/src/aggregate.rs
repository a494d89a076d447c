//! Grouping of raw price records into the locality → brand → fuel board.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::brands::BrandAllowList;
use crate::fuel::{fuel_name, FuelGrade, UNKNOWN_FUEL};
use crate::geo::{Coordinate, Located};
use crate::records::{EffectiveDate, PriceRecord};

/// Latest known price for one fuel of one brand in one locality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelPrice {
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "fecha_vigencia")]
    pub effective_date: EffectiveDate,
}

#[derive(Debug, Clone, PartialEq)]
struct FuelEntry {
    name: String,
    code: u32,
    price: FuelPrice,
}

/// The fuels of one brand, kept in presentation order.
///
/// Serializes as a JSON object whose keys follow that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrandFuels {
    entries: Vec<FuelEntry>,
}

impl BrandFuels {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FuelPrice> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.price)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FuelPrice)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.price))
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep `record` unless the group already holds an entry that is at
    /// least as recent. Equal dates keep the first-seen entry.
    fn offer(&mut self, name: &str, code: u32, price: FuelPrice) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => {
                if price.effective_date > existing.price.effective_date {
                    existing.code = code;
                    existing.price = price;
                }
            }
            None => self.entries.push(FuelEntry {
                name: name.to_owned(),
                code,
                price,
            }),
        }
    }

    fn sort_canonical(&mut self) {
        self.entries.sort_by_key(|e| {
            FuelGrade::from_code(e.code).map_or(usize::MAX, FuelGrade::rank)
        });
    }
}

impl Serialize for BrandFuels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.price)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocalityPrices {
    #[serde(rename = "coordenadas", skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
    #[serde(rename = "empresas")]
    pub brands: BTreeMap<String, BrandFuels>,
}

/// Aggregated prices keyed by locality name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceBoard {
    pub localities: BTreeMap<String, LocalityPrices>,
}

impl PriceBoard {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.localities.is_empty()
    }

    #[must_use]
    pub fn get(&self, locality: &str) -> Option<&LocalityPrices> {
        self.localities.get(locality)
    }

    /// Every fuel price on the board, across all localities and brands.
    pub fn fuel_prices(&self) -> impl Iterator<Item = &FuelPrice> {
        self.localities
            .values()
            .flat_map(|l| l.brands.values())
            .flat_map(|b| b.entries.iter().map(|e| &e.price))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AggregateOptions {
    /// Reorder each brand's fuels as SUPER, PREMIUM, GNC, DIESEL,
    /// DIESEL-PREMIUM, with unknown fuels last.
    pub canonical_order: bool,
    /// Drop records whose fuel name cannot be resolved instead of grouping
    /// them under [`UNKNOWN_FUEL`].
    pub skip_unknown_fuels: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            canonical_order: true,
            skip_unknown_fuels: false,
        }
    }
}

/// Group `records` into a [`PriceBoard`], keeping the most recent price per
/// (locality, brand, fuel name).
///
/// Records from brands outside `allowed` and records with a non-positive
/// price are discarded.
pub fn aggregate_prices<I>(records: I, allowed: &BrandAllowList, options: AggregateOptions) -> PriceBoard
where
    I: IntoIterator<Item = PriceRecord>,
{
    let mut board = PriceBoard::default();

    for record in records {
        if !allowed.contains(&record.brand) || record.price <= Decimal::ZERO {
            continue;
        }

        let name = fuel_name(record.fuel_type_code, &record.brand);
        if options.skip_unknown_fuels && name == UNKNOWN_FUEL {
            continue;
        }

        let position = record.coordinate();
        let locality = board.localities.entry(record.locality).or_default();
        if locality.coordinates.is_none() {
            locality.coordinates = position;
        }

        locality.brands.entry(record.brand).or_default().offer(
            name,
            record.fuel_type_code,
            FuelPrice {
                price: record.price,
                effective_date: record.effective_date,
            },
        );
    }

    if options.canonical_order {
        for fuels in board
            .localities
            .values_mut()
            .flat_map(|l| l.brands.values_mut())
        {
            fuels.sort_canonical();
        }
    }

    board
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn record(locality: &str, brand: &str, code: u32, price: i64, date: &str) -> PriceRecord {
        PriceRecord {
            locality: locality.to_owned(),
            brand: brand.to_owned(),
            fuel_type_code: code,
            price: Decimal::from(price),
            effective_date: EffectiveDate::from_str(date).unwrap(),
            latitude: None,
            longitude: None,
        }
    }

    fn aggregate(records: Vec<PriceRecord>) -> PriceBoard {
        aggregate_prices(records, &BrandAllowList::default(), AggregateOptions::default())
    }

    #[test]
    fn most_recent_record_wins() {
        let board = aggregate(vec![
            record("X", "YPF", 2, 900, "2024-01-01"),
            record("X", "YPF", 2, 950, "2024-02-01"),
        ]);

        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "X": { "empresas": { "YPF": { "SUPER": {
                    "precio": 950.0,
                    "fecha_vigencia": "2024-02-01"
                }}}}
            })
        );
    }

    #[test]
    fn older_record_after_newer_is_ignored() {
        let board = aggregate(vec![
            record("X", "YPF", 2, 950, "2024-02-01"),
            record("X", "YPF", 2, 900, "2024-01-01"),
        ]);
        let price = board.get("X").unwrap().brands["YPF"].get("SUPER").unwrap();
        assert_eq!(price.price, Decimal::from(950));
    }

    #[test]
    fn equal_dates_keep_first_seen() {
        let board = aggregate(vec![
            record("X", "AXION", 3, 1000, "2024-02-01T10:00:00"),
            record("X", "AXION", 3, 1100, "2024-02-01T10:00:00"),
        ]);
        let price = board.get("X").unwrap().brands["AXION"].get("QUANTIUM").unwrap();
        assert_eq!(price.price, Decimal::from(1000));
    }

    #[test]
    fn unknown_brands_and_non_positive_prices_are_dropped() {
        let board = aggregate(vec![
            record("X", "GULF", 2, 900, "2024-01-01"),
            record("X", "YPF", 2, 0, "2024-01-01"),
            record("Y", "PUMA", 2, -5, "2024-01-01"),
        ]);
        assert!(board.is_empty());
    }

    #[test]
    fn fuels_follow_canonical_order() {
        let board = aggregate(vec![
            record("X", "YPF", 21, 1, "2024-01-01"),
            record("X", "YPF", 99, 1, "2024-01-01"),
            record("X", "YPF", 6, 1, "2024-01-01"),
            record("X", "YPF", 2, 1, "2024-01-01"),
            record("X", "YPF", 19, 1, "2024-01-01"),
            record("X", "YPF", 3, 1, "2024-01-01"),
        ]);
        let names = board.get("X").unwrap().brands["YPF"].names();
        assert_eq!(
            names,
            vec!["SUPER", "INFINIA", "GNC", "DIESEL500", "INFINIA DIESEL", UNKNOWN_FUEL]
        );
    }

    #[test]
    fn insertion_order_kept_when_ordering_disabled() {
        let board = aggregate_prices(
            vec![
                record("X", "YPF", 21, 1, "2024-01-01"),
                record("X", "YPF", 2, 1, "2024-01-01"),
            ],
            &BrandAllowList::default(),
            AggregateOptions {
                canonical_order: false,
                skip_unknown_fuels: false,
            },
        );
        let names = board.get("X").unwrap().brands["YPF"].names();
        assert_eq!(names, vec!["INFINIA DIESEL", "SUPER"]);
    }

    #[test]
    fn unknown_fuels_can_be_skipped() {
        let board = aggregate_prices(
            vec![record("X", "YPF", 99, 1, "2024-01-01")],
            &BrandAllowList::default(),
            AggregateOptions {
                canonical_order: true,
                skip_unknown_fuels: true,
            },
        );
        assert!(board.is_empty());
    }

    #[test]
    fn locality_takes_first_available_coordinates() {
        let mut first = record("X", "YPF", 2, 1, "2024-01-01");
        first.latitude = Some(-34.9);
        let mut second = record("X", "PUMA", 2, 1, "2024-01-01");
        second.latitude = Some(-35.0);
        second.longitude = Some(-57.9);
        let mut third = record("X", "AXION", 2, 1, "2024-01-01");
        third.latitude = Some(-36.0);
        third.longitude = Some(-58.0);

        let board = aggregate(vec![first, second, third]);
        assert_eq!(
            board.get("X").unwrap().coordinates,
            Some(Coordinate::new(-35.0, -57.9))
        );
    }

    #[test]
    fn serialized_keys_follow_entry_order() {
        let board = aggregate(vec![
            record("X", "YPF", 19, 1, "2024-01-01"),
            record("X", "YPF", 2, 1, "2024-01-01"),
        ]);
        let json = serde_json::to_string(&board.get("X").unwrap().brands["YPF"]).unwrap();
        let super_at = json.find("SUPER").unwrap();
        let diesel_at = json.find("DIESEL500").unwrap();
        assert!(super_at < diesel_at, "{json}");
    }

    #[test]
    fn at_most_one_entry_per_group_and_it_is_the_latest() {
        let localities = ["A", "B", "C"];
        let brands = ["YPF", "AXION", "PUMA", "SHELL C.A.P.S.A."];
        let codes = [2, 3, 6, 19, 21];
        let mut records = Vec::new();
        let mut n: i64 = 0;
        for round in 0..4 {
            for locality in localities {
                for brand in brands {
                    for code in codes {
                        n += 1;
                        let day = 1 + (n * 7 + round * 3) % 28;
                        records.push(record(
                            locality,
                            brand,
                            code,
                            100 + n,
                            &format!("2024-03-{day:02}"),
                        ));
                    }
                }
            }
        }

        let board = aggregate(records.clone());
        for (locality, prices) in &board.localities {
            for (brand, fuels) in &prices.brands {
                let mut seen = std::collections::HashSet::new();
                for (name, price) in fuels.iter() {
                    assert!(seen.insert(name), "duplicate {locality}/{brand}/{name}");
                    let latest = records
                        .iter()
                        .filter(|r| {
                            &r.locality == locality
                                && &r.brand == brand
                                && fuel_name(r.fuel_type_code, &r.brand) == name
                        })
                        .map(|r| &r.effective_date)
                        .max()
                        .unwrap();
                    assert_eq!(&price.effective_date, latest);
                }
            }
        }
    }
}
