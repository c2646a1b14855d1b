use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::types::ListEnvelope;
use models::menu::{self, MenuFields};

use crate::errors::{parse_id, JsonApiError};
use crate::state::AppState;

#[utoipa::path(
    post, path = "/menus/{restaurant_id}", tag = "menus",
    params(("restaurant_id" = String, Path, description = "Restaurant ID")),
    request_body = crate::openapi::MenuInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::MenuDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
    body: Result<Json<MenuFields>, JsonRejection>,
) -> Result<(StatusCode, Json<menu::Model>), JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let Json(fields) = body?;
    let created = state.store.create_menu(restaurant_id, fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/menus/{restaurant_id}", tag = "menus",
    params(("restaurant_id" = String, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Menus in creation order"),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
) -> Result<Json<ListEnvelope<menu::Model>>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let list = state.store.list_menus(restaurant_id).await?;
    Ok(Json(ListEnvelope::new("menus", list)))
}

#[utoipa::path(
    get, path = "/menus/{restaurant_id}/{id}", tag = "menus",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Menu ID")
    ),
    responses(
        (status = 200, description = "OK", body = crate::openapi::MenuDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path((restaurant_id, id)): Path<(String, String)>,
) -> Result<Json<menu::Model>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let id = parse_id(&id, "menu")?;
    Ok(Json(state.store.get_menu(restaurant_id, id).await?))
}

#[utoipa::path(
    put, path = "/menus/{restaurant_id}/{id}", tag = "menus",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Menu ID")
    ),
    request_body = crate::openapi::MenuInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::MenuDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path((restaurant_id, id)): Path<(String, String)>,
    body: Result<Json<MenuFields>, JsonRejection>,
) -> Result<Json<menu::Model>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let id = parse_id(&id, "menu")?;
    let Json(fields) = body?;
    Ok(Json(state.store.update_menu(restaurant_id, id, fields).await?))
}

#[utoipa::path(
    delete, path = "/menus/{restaurant_id}/{id}", tag = "menus",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Menu ID")
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
    let id = parse_id(&id, "menu")?;
    state.store.delete_menu(restaurant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
