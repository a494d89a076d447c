mod increases;
mod indicators;
mod location;
mod prices;
mod search;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use naftas_core::{AppConfig, BrandAllowList, CityIndex};
use naftas_feeds::{build_http_client, FeedError, IncreasesClient, PriceFeed, StationsClient};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

/// Everything a handler needs. Immutable after start-up.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub prices: Arc<PriceFeed>,
    pub stations: Arc<StationsClient>,
    pub increases: Arc<IncreasesClient>,
    pub cities: Arc<CityIndex>,
    pub brands: Arc<BrandAllowList>,
}

impl AppState {
    /// Wires every upstream client to one shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the HTTP client cannot be built.
    pub fn from_config(
        config: Arc<AppConfig>,
        cities: CityIndex,
        brands: BrandAllowList,
    ) -> Result<Self, FeedError> {
        let client = build_http_client(config.request_timeout_secs, &config.user_agent)?;
        Ok(Self {
            prices: Arc::new(PriceFeed::from_config(&config, client.clone())),
            stations: Arc::new(StationsClient::new(client.clone(), &config.stations_url)),
            increases: Arc::new(IncreasesClient::new(client, &config.increases_url)),
            cities: Arc::new(cities),
            brands: Arc::new(brands),
            config,
        })
    }
}

/// Error body returned by every route: `{ "error": message, "code": code }`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    pub request_id: String,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
            request_id: request_id.into(),
        }
    }

    pub fn bad_request(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, "bad_request", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_feed_error(request_id: String, error: &FeedError) -> ApiError {
    tracing::error!(request_id = %request_id, error = %error, "upstream fetch failed");
    ApiError::new(request_id, "upstream_error", "upstream data source unavailable")
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/location",
            get(location::get_location).post(location::post_location),
        )
        .route(
            "/api/precio-base",
            get(prices::get_precio_base).post(prices::post_precio_base),
        )
        .route("/api/search", get(search::search_cities))
        .route("/api/increases", get(increases::get_increases))
        .route("/api/indicators", get(indicators::get_indicators))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}
