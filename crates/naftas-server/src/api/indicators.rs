use axum::{
    extract::{Query, State},
    Extension, Json,
};
use naftas_core::{aggregate_prices, attractiveness_score, AggregateOptions, GlobalAverages, PriceBoard, ScoreBand};
use naftas_feeds::{FeedQuery, PriceSource};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_feed_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct IndicatorsQuery {
    ciudad: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(super) struct IndicatorItem {
    pub localidad: String,
    pub empresa: String,
    pub puntaje: f64,
    pub banda: ScoreBand,
}

pub(super) async fn get_indicators(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<IndicatorsQuery>,
) -> Result<Json<Vec<IndicatorItem>>, ApiError> {
    let Some(ciudad) = params
        .ciudad
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty())
    else {
        return Err(ApiError::bad_request(req_id.0, "'ciudad' is required"));
    };

    let records = state
        .prices
        .fetch_raw_records(&FeedQuery::locality(ciudad))
        .await
        .map_err(|e| map_feed_error(req_id.0.clone(), &e))?;
    let board = aggregate_prices(records, &state.brands, AggregateOptions::default());

    Ok(Json(indicators(&board)))
}

/// One score per (locality, brand); brands the score skips are left out.
pub(super) fn indicators(board: &PriceBoard) -> Vec<IndicatorItem> {
    let Some(global) = GlobalAverages::from_board(board) else {
        return Vec::new();
    };

    board
        .localities
        .iter()
        .flat_map(|(localidad, prices)| {
            prices.brands.iter().filter_map(move |(empresa, fuels)| {
                let puntaje = attractiveness_score(fuels, &global)?;
                Some(IndicatorItem {
                    localidad: localidad.clone(),
                    empresa: empresa.clone(),
                    puntaje: (puntaje * 10.0).round() / 10.0,
                    banda: ScoreBand::from_score(puntaje),
                })
            })
        })
        .collect()
}
