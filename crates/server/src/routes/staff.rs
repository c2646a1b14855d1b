use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::types::ListEnvelope;
use models::staff::{self, StaffFields};

use crate::errors::{parse_id, JsonApiError};
use crate::state::AppState;

#[utoipa::path(
    post, path = "/staff/{restaurant_id}", tag = "staff",
    params(("restaurant_id" = String, Path, description = "Restaurant ID")),
    request_body = crate::openapi::StaffInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::StaffDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
    body: Result<Json<StaffFields>, JsonRejection>,
) -> Result<(StatusCode, Json<staff::Model>), JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let Json(fields) = body?;
    let created = state.store.create_staff(restaurant_id, fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/staff/{restaurant_id}", tag = "staff",
    params(("restaurant_id" = String, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Staff in creation order"),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
) -> Result<Json<ListEnvelope<staff::Model>>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let list = state.store.list_staff(restaurant_id).await?;
    Ok(Json(ListEnvelope::new("staff", list)))
}

#[utoipa::path(
    get, path = "/staff/{restaurant_id}/{id}", tag = "staff",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Staff member ID")
    ),
    responses(
        (status = 200, description = "OK", body = crate::openapi::StaffDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path((restaurant_id, id)): Path<(String, String)>,
) -> Result<Json<staff::Model>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let id = parse_id(&id, "staff member")?;
    Ok(Json(state.store.get_staff(restaurant_id, id).await?))
}

#[utoipa::path(
    put, path = "/staff/{restaurant_id}/{id}", tag = "staff",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Staff member ID")
    ),
    request_body = crate::openapi::StaffInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::StaffDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path((restaurant_id, id)): Path<(String, String)>,
    body: Result<Json<StaffFields>, JsonRejection>,
) -> Result<Json<staff::Model>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let id = parse_id(&id, "staff member")?;
    let Json(fields) = body?;
    Ok(Json(state.store.update_staff(restaurant_id, id, fields).await?))
}

#[utoipa::path(
    delete, path = "/staff/{restaurant_id}/{id}", tag = "staff",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Staff member ID")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path((restaurant_id, id)): Path<(String, String)>,
) -> Result<StatusCode, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let id = parse_id(&id, "staff member")?;
    state.store.delete_staff(restaurant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
