use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::types::ListEnvelope;
use models::dining_table::{self, TableFields};

use crate::errors::{parse_id, JsonApiError};
use crate::state::AppState;

#[utoipa::path(
    post, path = "/tables/{restaurant_id}", tag = "tables",
    params(("restaurant_id" = String, Path, description = "Restaurant ID")),
    request_body = crate::openapi::TableInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::TableDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Table number taken", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
    body: Result<Json<TableFields>, JsonRejection>,
) -> Result<(StatusCode, Json<dining_table::Model>), JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let Json(fields) = body?;
    let created = state.store.create_table(restaurant_id, fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/tables/{restaurant_id}", tag = "tables",
    params(("restaurant_id" = String, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Tables in creation order"),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
) -> Result<Json<ListEnvelope<dining_table::Model>>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let list = state.store.list_tables(restaurant_id).await?;
    Ok(Json(ListEnvelope::new("tables", list)))
}

#[utoipa::path(
    get, path = "/tables/{restaurant_id}/{id}", tag = "tables",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Table ID")
    ),
    responses(
        (status = 200, description = "OK", body = crate::openapi::TableDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path((restaurant_id, id)): Path<(String, String)>,
) -> Result<Json<dining_table::Model>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let id = parse_id(&id, "table")?;
    Ok(Json(state.store.get_table(restaurant_id, id).await?))
}

#[utoipa::path(
    put, path = "/tables/{restaurant_id}/{id}", tag = "tables",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Table ID")
    ),
    request_body = crate::openapi::TableInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::TableDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Table number taken", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path((restaurant_id, id)): Path<(String, String)>,
    body: Result<Json<TableFields>, JsonRejection>,
) -> Result<Json<dining_table::Model>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let id = parse_id(&id, "table")?;
    let Json(fields) = body?;
    Ok(Json(state.store.update_table(restaurant_id, id, fields).await?))
}

#[utoipa::path(
    delete, path = "/tables/{restaurant_id}/{id}", tag = "tables",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Table ID")
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
    let id = parse_id(&id, "table")?;
    state.store.delete_table(restaurant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
