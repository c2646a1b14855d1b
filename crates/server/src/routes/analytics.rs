//! Read-only reports derived from a restaurant's menus and reservations.

use axum::extract::{Path, State};
use axum::Json;
use service::analytics::{PopularTimes, ReservationStats, RevenueEstimate};

use crate::errors::{parse_id, JsonApiError};
use crate::state::AppState;

#[utoipa::path(
    get, path = "/analytics/{restaurant_id}/reservations", tag = "analytics",
    params(("restaurant_id" = String, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Counts by status and average party size"),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn reservations(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
) -> Result<Json<ReservationStats>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    Ok(Json(state.store.reservation_analytics(restaurant_id).await?))
}

#[utoipa::path(
    get, path = "/analytics/{restaurant_id}/revenue", tag = "analytics",
    params(("restaurant_id" = String, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Menu price statistics and estimated revenue"),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn revenue(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
) -> Result<Json<RevenueEstimate>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    Ok(Json(state.store.revenue_analytics(restaurant_id).await?))
}

#[utoipa::path(
    get, path = "/analytics/{restaurant_id}/popular-times", tag = "analytics",
    params(("restaurant_id" = String, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Busiest hours and weekdays"),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn popular_times(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
) -> Result<Json<PopularTimes>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    Ok(Json(state.store.popular_times(restaurant_id).await?))
}
