//! Merges per-fuel station responses into one summary per brand.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use naftas_core::{fuel_name, Confidence, Coordinate, EffectiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::RawStation;

/// One fuel price as shown on a station card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationPrice {
    pub tipo_combustible: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub precio: Decimal,
    pub fecha_vigencia: String,
    pub confiabilidad: Confidence,
    pub nombre: String,
    #[serde(skip)]
    date: Option<EffectiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSummary {
    #[serde(rename = "idempresa")]
    pub id_empresa: String,
    pub cuit: Option<String>,
    /// Brand ("empresabandera").
    pub nombre: String,
    pub direccion: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub razon_social: Option<String>,
    pub localidad: Option<String>,
    pub precios: BTreeMap<u32, StationPrice>,
    /// Kilometres from the board's anchor; `None` without coordinates.
    pub distancia: Option<f64>,
}

impl StationSummary {
    fn from_raw(raw: &RawStation) -> Self {
        Self {
            id_empresa: raw.id(),
            cuit: raw.cuit.clone(),
            nombre: raw.empresabandera.clone(),
            direccion: raw.direccion.clone(),
            lat: raw.lat.as_ref().and_then(|v| v.as_f64()),
            lon: raw.lon.as_ref().and_then(|v| v.as_f64()),
            razon_social: raw.razonsocial.clone(),
            localidad: raw.localidad.clone(),
            precios: BTreeMap::new(),
            distancia: None,
        }
    }

    fn latest_update(&self) -> Option<NaiveDateTime> {
        self.precios
            .values()
            .filter_map(|p| p.date.as_ref().map(EffectiveDate::naive))
            .max()
    }

    /// Replace the price for `code` unless the held one is at least as new.
    /// A held price with an unreadable date is never replaced.
    fn offer(&mut self, price: StationPrice) {
        match self.precios.get(&price.tipo_combustible) {
            Some(held) => {
                let newer = match (&price.date, &held.date) {
                    (Some(new), Some(old)) => new > old,
                    _ => false,
                };
                if newer {
                    self.precios.insert(price.tipo_combustible, price);
                }
            }
            None => {
                self.precios.insert(price.tipo_combustible, price);
            }
        }
    }
}

/// Build the board from `(fuel code, stations)` responses.
///
/// Stations are merged by id in first-seen order. Only high-confidence
/// prices survive; the first station of each brand also picks up the
/// high-confidence prices of its sister stations. The result is sorted by
/// most recent price date, newest first, then by distance to `anchor`.
#[must_use]
pub fn build_board(
    responses: &[(u32, Vec<RawStation>)],
    anchor: Coordinate,
    now: NaiveDateTime,
) -> Vec<StationSummary> {
    let merged = merge_stations(responses, now);

    let mut board: Vec<StationSummary> = Vec::new();
    for station in &merged {
        if board.iter().any(|s| s.nombre == station.nombre) {
            continue;
        }

        let mut summary = station.clone();
        summary.precios = high_confidence(station);
        for sister in merged
            .iter()
            .filter(|s| s.nombre == station.nombre && s.id_empresa != station.id_empresa)
        {
            summary.precios.extend(high_confidence(sister));
        }

        summary.distancia = Coordinate::from_parts(summary.lat, summary.lon)
            .map(|position| position.distance_km(&anchor));
        board.push(summary);
    }

    board.sort_by(compare_for_board);
    board
}

fn merge_stations(responses: &[(u32, Vec<RawStation>)], now: NaiveDateTime) -> Vec<StationSummary> {
    let mut merged: Vec<StationSummary> = Vec::new();

    for (code, stations) in responses {
        for raw in stations {
            let id = raw.id();
            let index = match merged.iter().position(|s| s.id_empresa == id) {
                Some(index) => index,
                None => {
                    merged.push(StationSummary::from_raw(raw));
                    merged.len() - 1
                }
            };

            let Some(entry) = raw.price_for(*code) else {
                continue;
            };
            let Some(precio) = entry.precio.as_ref().and_then(|p| p.as_decimal()) else {
                continue;
            };
            if precio <= Decimal::ZERO {
                continue;
            }

            let fecha_vigencia = entry.fechavigencia.unwrap_or_default();
            let date = fecha_vigencia.parse::<EffectiveDate>().ok();
            merged[index].offer(StationPrice {
                tipo_combustible: *code,
                precio,
                confiabilidad: Confidence::classify(date.as_ref(), now),
                nombre: fuel_name(*code, &raw.empresabandera).to_owned(),
                fecha_vigencia,
                date,
            });
        }
    }

    merged
}

fn high_confidence(station: &StationSummary) -> BTreeMap<u32, StationPrice> {
    station
        .precios
        .iter()
        .filter(|(_, p)| p.confiabilidad == Confidence::High)
        .map(|(code, p)| (*code, p.clone()))
        .collect()
}

fn compare_for_board(a: &StationSummary, b: &StationSummary) -> Ordering {
    b.latest_update()
        .cmp(&a.latest_update())
        .then_with(|| match (a.distancia, b.distancia) {
            (Some(da), Some(db)) => da.total_cmp(&db),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;
