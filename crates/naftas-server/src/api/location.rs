use axum::{
    body::Bytes,
    extract::{Query, State},
    Extension, Json,
};
use naftas_core::{nearest, Coordinate};
use naftas_feeds::{FeedQuery, PriceSource};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_feed_error, ApiError, AppState};

const INVALID_COORDINATES: &str = "'lat' and 'long' are required and must be valid numbers";

#[derive(Debug, Deserialize)]
pub(super) struct LocationQuery {
    lat: Option<String>,
    long: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocationBody {
    lat: Option<serde_json::Value>,
    long: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub(super) struct LocationResponse {
    /// Nearest locality name, `null` when no candidate has coordinates.
    zone: Option<String>,
}

fn parse_degrees(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(super) async fn get_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<LocationResponse>, ApiError> {
    let (Some(lat), Some(lon)) = (
        parse_degrees(params.lat.as_deref()),
        parse_degrees(params.long.as_deref()),
    ) else {
        return Err(ApiError::bad_request(req_id.0, INVALID_COORDINATES));
    };

    resolve(&state, req_id, Coordinate::new(lat, lon)).await
}

/// Body must be `{ "lat": number, "long": number }`; strings are rejected.
pub(super) async fn post_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<LocationResponse>, ApiError> {
    let parsed: Option<LocationBody> = serde_json::from_slice(&body).ok();
    let coordinate = parsed.and_then(|b| {
        let lat = b.lat?.as_f64()?;
        let lon = b.long?.as_f64()?;
        Some(Coordinate::new(lat, lon))
    });

    let Some(coordinate) = coordinate else {
        return Err(ApiError::bad_request(req_id.0, INVALID_COORDINATES));
    };

    resolve(&state, req_id, coordinate).await
}

async fn resolve(
    state: &AppState,
    req_id: RequestId,
    target: Coordinate,
) -> Result<Json<LocationResponse>, ApiError> {
    let records = state
        .prices
        .fetch_raw_records(&FeedQuery::brand(state.config.location_brand.clone()))
        .await
        .map_err(|e| map_feed_error(req_id.0.clone(), &e))?;

    let zone = nearest(target, &records).map(|r| r.locality.clone());
    tracing::info!(
        lat = target.latitude,
        lon = target.longitude,
        candidates = records.len(),
        zone = zone.as_deref().unwrap_or("-"),
        "nearest locality resolved"
    );

    Ok(Json(LocationResponse { zone }))
}
