//! The dataset's full CSV export, filtered locally.

use naftas_core::{EffectiveDate, PriceRecord};
use reqwest::Client;
use rust_decimal::Decimal;

use crate::client::ensure_success;
use crate::error::FeedError;
use crate::source::{FeedQuery, PriceSource};
use crate::types::{CsvRow, LenientNumber};

/// Downloads the CSV export and keeps the rows matching the query.
///
/// The export has no server-side filtering, so every call transfers the
/// whole file.
#[derive(Debug, Clone)]
pub struct CsvFeed {
    client: Client,
    url: String,
}

impl CsvFeed {
    #[must_use]
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_owned(),
        }
    }
}

impl PriceSource for CsvFeed {
    async fn fetch_raw_records(&self, query: &FeedQuery) -> Result<Vec<PriceRecord>, FeedError> {
        let response = self.client.get(&self.url).send().await?;
        let response = ensure_success(response)?;
        let body = response.bytes().await?;

        let records = parse_csv(&body, query)?;
        tracing::debug!(
            locality = query.locality.as_deref().unwrap_or("*"),
            brand = query.brand.as_deref().unwrap_or("*"),
            records = records.len(),
            "csv fetch complete"
        );
        Ok(records)
    }
}

/// Parses the CSV body into records matching `query`.
///
/// A row that does not fit the header layout fails the whole parse. Rows
/// that fit but carry an unusable price or date are skipped.
pub(crate) fn parse_csv(body: &[u8], query: &FeedQuery) -> Result<Vec<PriceRecord>, FeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(body);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in reader.deserialize::<CsvRow>() {
        let row = row?;
        if !query.matches(&row.localidad, &row.empresabandera) {
            continue;
        }
        match to_price_record(row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "csv rows with unusable price or date skipped");
    }
    Ok(records)
}

fn to_price_record(row: CsvRow) -> Option<PriceRecord> {
    let price: Decimal = LenientNumber::Text(row.precio).as_decimal()?;
    let effective_date = row.fecha_vigencia.parse::<EffectiveDate>().ok()?;
    Some(PriceRecord {
        locality: row.localidad,
        brand: row.empresabandera,
        fuel_type_code: row.idproducto?,
        price,
        effective_date,
        latitude: row.latitud.filter(|v| v.is_finite()),
        longitude: row.longitud.filter(|v| v.is_finite()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "indice_tiempo,idempresa,cuit,empresa,direccion,localidad,provincia,region,idproducto,producto,idtipohorario,tipohorario,precio,fecha_vigencia,idempresabandera,empresabandera,latitud,longitud,geojson";

    fn csv(rows: &[&str]) -> Vec<u8> {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.into_bytes()
    }

    #[test]
    fn parses_rows_and_filters_by_locality() {
        let body = csv(&[
            "2024-02,1,30-1,EST1,CALLE 1,BERISSO,BUENOS AIRES,PAMPEANA,2,Nafta (súper) entre 92 y 95 Ron,2,Diurno,950.5,2024-02-01 10:00:00,28,YPF,-34.87,-57.88,",
            "2024-02,2,30-2,EST2,CALLE 2,ENSENADA,BUENOS AIRES,PAMPEANA,2,Nafta (súper) entre 92 y 95 Ron,2,Diurno,940,2024-02-01 10:00:00,28,YPF,,,",
        ]);
        let records = parse_csv(&body, &FeedQuery::locality("BERISSO")).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.locality, "BERISSO");
        assert_eq!(r.brand, "YPF");
        assert_eq!(r.fuel_type_code, 2);
        assert_eq!(r.price, Decimal::new(9505, 1));
        assert_eq!(r.latitude, Some(-34.87));
    }

    #[test]
    fn empty_coordinates_become_none() {
        let body = csv(&[
            "2024-02,2,30-2,EST2,CALLE 2,ENSENADA,BUENOS AIRES,PAMPEANA,19,Gas Oil Grado 2,2,Diurno,940,2024-02-01,28,PUMA,,,",
        ]);
        let records = parse_csv(&body, &FeedQuery::default()).unwrap();
        assert_eq!(records[0].latitude, None);
        assert_eq!(records[0].longitude, None);
    }

    #[test]
    fn unusable_values_are_skipped() {
        let body = csv(&[
            "2024-02,2,30-2,EST2,CALLE 2,ENSENADA,BUENOS AIRES,PAMPEANA,19,Gas Oil,2,Diurno,s/d,2024-02-01,28,PUMA,,,",
            "2024-02,2,30-2,EST2,CALLE 2,ENSENADA,BUENOS AIRES,PAMPEANA,19,Gas Oil,2,Diurno,900,ayer,28,PUMA,,,",
        ]);
        assert!(parse_csv(&body, &FeedQuery::default()).unwrap().is_empty());
    }

    #[test]
    fn wrong_column_count_is_an_error() {
        let body = csv(&["only,three,columns"]);
        assert!(matches!(
            parse_csv(&body, &FeedQuery::default()),
            Err(FeedError::Csv(_))
        ));
    }
}
