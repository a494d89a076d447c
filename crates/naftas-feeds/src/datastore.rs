//! CKAN `datastore_search` client for the fuel-price dataset.

use naftas_core::{EffectiveDate, PriceRecord};
use reqwest::Client;
use serde_json::{json, Map, Value};

use crate::client::{ensure_success, read_json};
use crate::error::FeedError;
use crate::source::{FeedQuery, PriceSource};
use crate::types::{DatastoreEnvelope, DatastoreRecord};

/// Posts filtered `datastore_search` queries for one dataset resource.
#[derive(Debug, Clone)]
pub struct DatastoreFeed {
    client: Client,
    url: String,
    resource_id: String,
    limit: u32,
}

impl DatastoreFeed {
    #[must_use]
    pub fn new(client: Client, url: &str, resource_id: &str, limit: u32) -> Self {
        Self {
            client,
            url: url.to_owned(),
            resource_id: resource_id.to_owned(),
            limit,
        }
    }

    /// Request body: `{ resource_id, filters, limit, offset: 0 }`.
    fn request_body(&self, query: &FeedQuery) -> Value {
        let mut filters = Map::new();
        if let Some(locality) = &query.locality {
            filters.insert("localidad".to_owned(), Value::String(locality.clone()));
        }
        if let Some(brand) = &query.brand {
            filters.insert("empresabandera".to_owned(), Value::String(brand.clone()));
        }

        json!({
            "resource_id": self.resource_id,
            "filters": filters,
            "limit": self.limit,
            "offset": 0,
        })
    }
}

impl PriceSource for DatastoreFeed {
    async fn fetch_raw_records(&self, query: &FeedQuery) -> Result<Vec<PriceRecord>, FeedError> {
        let response = self
            .client
            .post(&self.url)
            .json(&self.request_body(query))
            .send()
            .await?;
        let response = ensure_success(response)?;
        let envelope: DatastoreEnvelope = read_json(response, "datastore_search").await?;

        if !envelope.success {
            let reason = envelope
                .error
                .as_ref()
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("datastore_search returned success=false")
                .to_owned();
            return Err(FeedError::Upstream(reason));
        }

        let raw = envelope.result.map(|r| r.records).unwrap_or_default();
        let fetched = raw.len();
        let records: Vec<PriceRecord> = raw.into_iter().filter_map(to_price_record).collect();

        if records.len() < fetched {
            tracing::warn!(
                skipped = fetched - records.len(),
                "incomplete datastore records skipped"
            );
        }
        tracing::debug!(
            locality = query.locality.as_deref().unwrap_or("*"),
            brand = query.brand.as_deref().unwrap_or("*"),
            records = records.len(),
            "datastore fetch complete"
        );

        Ok(records)
    }
}

fn to_price_record(raw: DatastoreRecord) -> Option<PriceRecord> {
    let effective_date = raw.fecha_vigencia.as_deref()?.parse::<EffectiveDate>().ok()?;
    Some(PriceRecord {
        locality: raw.localidad?,
        brand: raw.empresabandera?,
        fuel_type_code: raw.idproducto?.as_u32()?,
        price: raw.precio?.as_decimal()?,
        effective_date,
        latitude: raw.latitud.and_then(|v| v.as_f64()),
        longitude: raw.longitud.and_then(|v| v.as_f64()),
    })
}
