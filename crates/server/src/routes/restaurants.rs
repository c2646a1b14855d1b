use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::types::ListEnvelope;
use models::restaurant::{self, RestaurantFields};
use tracing::info;

use crate::errors::{parse_id, JsonApiError};
use crate::state::AppState;

#[utoipa::path(
    post, path = "/restaurants", tag = "restaurants",
    request_body = crate::openapi::RestaurantInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::RestaurantDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<RestaurantFields>, JsonRejection>,
) -> Result<(StatusCode, Json<restaurant::Model>), JsonApiError> {
    let Json(fields) = body?;
    let r = state.store.create_restaurant(fields).await?;
    info!(restaurant_id = %r.id, name = %r.name, "restaurant_created");
    Ok((StatusCode::CREATED, Json(r)))
}

#[utoipa::path(
    get, path = "/restaurants", tag = "restaurants",
    responses((status = 200, description = "All restaurants in creation order"))
)]
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ListEnvelope<restaurant::Model>>, JsonApiError> {
    let list = state.store.list_restaurants().await?;
    Ok(Json(ListEnvelope::new("restaurants", list)))
}

#[utoipa::path(
    get, path = "/restaurants/{id}", tag = "restaurants",
    params(("id" = String, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::RestaurantDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<restaurant::Model>, JsonApiError> {
    let id = parse_id(&id, "restaurant")?;
    Ok(Json(state.store.get_restaurant(id).await?))
}

#[utoipa::path(
    put, path = "/restaurants/{id}", tag = "restaurants",
    params(("id" = String, Path, description = "Restaurant ID")),
    request_body = crate::openapi::RestaurantInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::RestaurantDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<RestaurantFields>, JsonRejection>,
) -> Result<Json<restaurant::Model>, JsonApiError> {
    let id = parse_id(&id, "restaurant")?;
    let Json(fields) = body?;
    Ok(Json(state.store.update_restaurant(id, fields).await?))
}

/// Removes the restaurant with its menus, tables, staff and reservations.
#[utoipa::path(
    delete, path = "/restaurants/{id}", tag = "restaurants",
    params(("id" = String, Path, description = "Restaurant ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    let id = parse_id(&id, "restaurant")?;
    state.store.delete_restaurant(id).await?;
    info!(restaurant_id = %id, "restaurant_deleted");
    Ok(StatusCode::NO_CONTENT)
}
