//! Client for the "precios en surtidor" station web service.

mod board;

use chrono::Utc;
use futures::future::try_join_all;
use naftas_core::Coordinate;
use reqwest::multipart::Form;
use reqwest::Client;
use serde_json::json;

use crate::client::{ensure_success, read_json};
use crate::error::FeedError;
use crate::types::{RawStation, StationsResponse};

pub use board::{build_board, StationPrice, StationSummary};

const METHOD: &str = "getEmpresasAgrupadasBanderasCombustible";
/// Flag ids for YPF, Shell, Axion and Puma.
const BANDERAS: [&str; 4] = ["28", "2", "26", "4"];
/// Every fuel code the service knows about.
pub const FUEL_CODES: std::ops::RangeInclusive<u32> = 1..=21;
/// Half-width of the search box around the anchor, in degrees.
const BOUNDS_DEGREES: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct StationsClient {
    client: Client,
    url: String,
}

impl StationsClient {
    #[must_use]
    pub fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_owned(),
        }
    }

    /// Fetches every fuel code around `anchor` concurrently and builds the
    /// per-brand board.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any single fuel request fails or returns a body
    /// that cannot be parsed.
    pub async fn fetch_board(&self, anchor: Coordinate) -> Result<Vec<StationSummary>, FeedError> {
        let requests = FUEL_CODES.map(|code| async move {
            let stations = self.fetch_fuel(anchor, code).await?;
            Ok::<_, FeedError>((code, stations))
        });
        let responses = try_join_all(requests).await?;

        let station_count: usize = responses.iter().map(|(_, s)| s.len()).sum();
        let board = build_board(&responses, anchor, Utc::now().naive_utc());
        tracing::info!(
            lat = anchor.latitude,
            lon = anchor.longitude,
            stations = station_count,
            brands = board.len(),
            "station board built"
        );
        Ok(board)
    }

    async fn fetch_fuel(&self, anchor: Coordinate, code: u32) -> Result<Vec<RawStation>, FeedError> {
        let response = self
            .client
            .post(&self.url)
            .multipart(Self::form(anchor, code))
            .send()
            .await?;
        let response = ensure_success(response)?;
        let body: StationsResponse = read_json(response, &format!("{METHOD}(combustible={code})")).await?;
        Ok(body.resultado)
    }

    fn form(anchor: Coordinate, code: u32) -> Form {
        let bounds = json!({
            "so": {
                "lat": anchor.latitude - BOUNDS_DEGREES,
                "lng": anchor.longitude - BOUNDS_DEGREES,
            },
            "ne": {
                "lat": anchor.latitude + BOUNDS_DEGREES,
                "lng": anchor.longitude + BOUNDS_DEGREES,
            },
        });

        Form::new()
            .text("method", METHOD)
            .text("banderas", json!(BANDERAS).to_string())
            .text("combustible", code.to_string())
            .text("bounds", bounds.to_string())
    }
}
