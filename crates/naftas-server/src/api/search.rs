use axum::{
    extract::{Query, State},
    Extension, Json,
};
use naftas_core::{City, SearchError};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResponse {
    cities: Vec<City>,
}

pub(super) async fn search_cities(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.q.unwrap_or_default();

    match state.cities.search(&query) {
        Ok(matches) => Ok(Json(SearchResponse {
            cities: matches.into_iter().cloned().collect(),
        })),
        Err(e @ SearchError::QueryTooShort { .. }) => {
            Err(ApiError::bad_request(req_id.0, e.to_string()))
        }
        Err(e @ SearchError::NoMatch) => Err(ApiError::new(req_id.0, "not_found", e.to_string())),
    }
}
