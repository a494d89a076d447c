use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use naftas_core::{aggregate_prices, AggregateOptions, Zone};
use naftas_feeds::{FeedQuery, PriceSource};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_feed_error, ApiError, AppState};

/// `ciudad` selects the aggregated board for one locality; otherwise `zona`
/// (default `este`) selects the station board around that zone's anchor.
#[derive(Debug, Default, Deserialize)]
pub(super) struct PrecioBaseParams {
    ciudad: Option<String>,
    zona: Option<String>,
}

pub(super) async fn get_precio_base(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<PrecioBaseParams>,
) -> Result<Response, ApiError> {
    precio_base(&state, req_id, params).await
}

/// Same fields as the query string, sent as JSON. An empty body means
/// defaults.
pub(super) async fn post_precio_base(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let params = if body.iter().all(u8::is_ascii_whitespace) {
        PrecioBaseParams::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(req_id.0.clone(), format!("invalid JSON body: {e}")))?
    };
    precio_base(&state, req_id, params).await
}

async fn precio_base(
    state: &AppState,
    req_id: RequestId,
    params: PrecioBaseParams,
) -> Result<Response, ApiError> {
    let ciudad = params
        .ciudad
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty());

    if let Some(ciudad) = ciudad {
        let records = state
            .prices
            .fetch_raw_records(&FeedQuery::locality(ciudad.clone()))
            .await
            .map_err(|e| map_feed_error(req_id.0.clone(), &e))?;
        let fetched = records.len();
        let board = aggregate_prices(records, &state.brands, AggregateOptions::default());
        tracing::info!(
            ciudad = %ciudad,
            records = fetched,
            localities = board.localities.len(),
            "price board aggregated"
        );
        if board.is_empty() {
            return Err(ApiError::new(
                req_id.0,
                "not_found",
                format!("no prices found for {ciudad}"),
            ));
        }
        return Ok(Json(board).into_response());
    }

    let zone = Zone::parse_or_default(params.zona.as_deref().unwrap_or_default());
    let stations = state
        .stations
        .fetch_board(zone.anchor())
        .await
        .map_err(|e| map_feed_error(req_id.0.clone(), &e))?;
    tracing::info!(zona = zone.as_str(), stations = stations.len(), "station board served");
    Ok(Json(stations).into_response())
}
