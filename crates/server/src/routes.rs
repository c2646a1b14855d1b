pub mod ai;
pub mod analytics;
pub mod menus;
pub mod reservations;
pub mod restaurants;
pub mod staff;
pub mod tables;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use common::types::Health;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};
use utoipa::OpenApi;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Liveness plus store connectivity; 503 when the store cannot be reached.
#[utoipa::path(
    get, path = "/health", tag = "health",
    responses(
        (status = 200, description = "Healthy", body = crate::openapi::HealthResponse),
        (status = 503, description = "Store unreachable", body = crate::openapi::HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    let store_connected = state.store.ping().await;
    let (code, status) = if store_connected {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };
    let ai_provider = state.ai.provider().to_string();
    let health = Health {
        status,
        store_connected,
        ai_provider,
    };
    (code, Json(health))
}

async fn metrics() -> Result<impl IntoResponse, JsonApiError> {
    let body = service::observability::encode_metrics().map_err(|e| {
        error!(error = %e, "metrics encoding failed");
        JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None)
    })?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: resource CRUD, analytics, assistant and ops endpoints.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let resources = Router::new()
        .route(
            "/restaurants",
            post(restaurants::create).get(restaurants::list),
        )
        .route(
            "/restaurants/:id",
            get(restaurants::get)
                .put(restaurants::update)
                .delete(restaurants::delete),
        )
        .route(
            "/menus/:restaurant_id",
            post(menus::create).get(menus::list),
        )
        .route(
            "/menus/:restaurant_id/:id",
            get(menus::get).put(menus::update).delete(menus::delete),
        )
        .route(
            "/tables/:restaurant_id",
            post(tables::create).get(tables::list),
        )
        .route(
            "/tables/:restaurant_id/:id",
            get(tables::get).put(tables::update).delete(tables::delete),
        )
        .route(
            "/staff/:restaurant_id",
            post(staff::create).get(staff::list),
        )
        .route(
            "/staff/:restaurant_id/:id",
            get(staff::get).put(staff::update).delete(staff::delete),
        )
        .route(
            "/reservations/:restaurant_id",
            post(reservations::create).get(reservations::list),
        )
        .route(
            "/reservations/:restaurant_id/:id",
            get(reservations::get)
                .put(reservations::update)
                .delete(reservations::delete),
        )
        .route(
            "/reservations/:restaurant_id/:id/confirm",
            post(reservations::confirm),
        )
        .route(
            "/reservations/:restaurant_id/:id/cancel",
            post(reservations::cancel),
        );

    let reports = Router::new()
        .route(
            "/analytics/:restaurant_id/reservations",
            get(analytics::reservations),
        )
        .route("/analytics/:restaurant_id/revenue", get(analytics::revenue))
        .route(
            "/analytics/:restaurant_id/popular-times",
            get(analytics::popular_times),
        )
        .route("/ai/recommendations/menu", post(ai::recommend_menu))
        .route(
            "/ai/recommendations/reservation",
            post(ai::recommend_reservation),
        )
        .route("/ai/chat", post(ai::chat));

    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    resources
        .merge(reports)
        .merge(ops)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one span per request carrying method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and friends at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
