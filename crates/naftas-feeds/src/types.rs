//! Upstream payload shapes.
//!
//! The government services are loose about scalar types: the same field may
//! arrive as a JSON number in one record and a string in the next.
//! [`LenientNumber`] absorbs that before values reach the domain types.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

/// A JSON number, or a string holding one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LenientNumber {
    Number(serde_json::Number),
    Text(String),
}

impl LenientNumber {
    fn text(&self) -> String {
        match self {
            LenientNumber::Number(n) => n.to_string(),
            LenientNumber::Text(s) => s.trim().to_owned(),
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            LenientNumber::Number(n) => n.as_f64(),
            LenientNumber::Text(s) => s.trim().parse::<f64>().ok(),
        }?;
        value.is_finite().then_some(value)
    }

    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            LenientNumber::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            LenientNumber::Text(s) => s.trim().parse::<u32>().ok(),
        }
    }

    /// Exact decimal value; accepts scientific notation as well.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        let text = self.text();
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
    }
}

// ---------------------------------------------------------------------------
// CKAN datastore_search
// ---------------------------------------------------------------------------

/// `{ "success": bool, "result": { "records": [...] }, "error": {...} }`
#[derive(Debug, Deserialize)]
pub struct DatastoreEnvelope {
    pub success: bool,
    #[serde(default)]
    pub result: Option<DatastoreResult>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct DatastoreResult {
    #[serde(default)]
    pub records: Vec<DatastoreRecord>,
}

#[derive(Debug, Deserialize)]
pub struct DatastoreRecord {
    #[serde(default)]
    pub localidad: Option<String>,
    #[serde(default)]
    pub empresabandera: Option<String>,
    #[serde(default)]
    pub idproducto: Option<LenientNumber>,
    #[serde(default)]
    pub precio: Option<LenientNumber>,
    #[serde(default)]
    pub fecha_vigencia: Option<String>,
    #[serde(default)]
    pub latitud: Option<LenientNumber>,
    #[serde(default)]
    pub longitud: Option<LenientNumber>,
}

// ---------------------------------------------------------------------------
// Dataset CSV export
// ---------------------------------------------------------------------------

/// One row of the dataset CSV, in header order.
#[derive(Debug, Deserialize)]
pub struct CsvRow {
    #[serde(default)]
    pub indice_tiempo: Option<String>,
    #[serde(default)]
    pub idempresa: Option<String>,
    #[serde(default)]
    pub cuit: Option<String>,
    #[serde(default)]
    pub empresa: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    pub localidad: String,
    #[serde(default)]
    pub provincia: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pub idproducto: Option<u32>,
    #[serde(default)]
    pub producto: Option<String>,
    #[serde(default)]
    pub idtipohorario: Option<String>,
    #[serde(default)]
    pub tipohorario: Option<String>,
    pub precio: String,
    pub fecha_vigencia: String,
    #[serde(default)]
    pub idempresabandera: Option<String>,
    pub empresabandera: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub latitud: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub longitud: Option<f64>,
    #[serde(default)]
    pub geojson: Option<String>,
}

// ---------------------------------------------------------------------------
// Station web service (getEmpresasAgrupadasBanderasCombustible)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct StationsResponse {
    #[serde(default)]
    pub resultado: Vec<RawStation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStation {
    pub idempresa: LenientNumber,
    #[serde(default)]
    pub cuit: Option<String>,
    #[serde(default)]
    pub empresabandera: String,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub lat: Option<LenientNumber>,
    #[serde(default)]
    pub lon: Option<LenientNumber>,
    #[serde(default)]
    pub razonsocial: Option<String>,
    #[serde(default)]
    pub localidad: Option<String>,
    /// Keyed by fuel code. The service sends `[]` instead of `{}` when a
    /// station has no prices, so this is read loosely.
    #[serde(default)]
    pub precios: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStationPrice {
    #[serde(default)]
    pub precio: Option<LenientNumber>,
    #[serde(default)]
    pub fechavigencia: Option<String>,
}

impl RawStation {
    #[must_use]
    pub fn id(&self) -> String {
        self.idempresa.text()
    }

    /// The price entry for `code`, if the station reports one.
    #[must_use]
    pub fn price_for(&self, code: u32) -> Option<RawStationPrice> {
        let entry = self.precios.as_object()?.get(&code.to_string())?;
        serde_json::from_value(entry.clone()).ok()
    }
}
