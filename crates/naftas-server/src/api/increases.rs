use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Extension, Json,
};

use crate::middleware::RequestId;

use super::{map_feed_error, ApiError, AppState};

/// Twenty days at the shared cache.
const CACHE_CONTROL: &str = "public, s-maxage=1728000, stale-while-revalidate";

pub(super) async fn get_increases(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .increases
        .fetch()
        .await
        .map_err(|e| map_feed_error(req_id.0.clone(), &e))?;

    Ok(([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(body)))
}
