use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use common::types::ListEnvelope;
use models::reservation::{self, ReservationFields, ReservationStatus};
use models::validate::Checker;
use serde::Deserialize;
use service::ReservationFilter;
use tracing::info;
use utoipa::IntoParams;

use crate::errors::{parse_id, JsonApiError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReservationQuery {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// pending, confirmed or cancelled
    pub status: Option<String>,
}

impl ReservationQuery {
    fn into_filter(self) -> Result<ReservationFilter, JsonApiError> {
        let mut c = Checker::for_patch();
        let date = c.date("date", self.date);
        let status = c.parsed(
            "status",
            self.status,
            ReservationStatus::EXPECTED,
            ReservationStatus::parse,
        );
        c.finish()?;
        Ok(ReservationFilter { date, status })
    }
}

#[utoipa::path(
    post, path = "/reservations/{restaurant_id}", tag = "reservations",
    params(("restaurant_id" = String, Path, description = "Restaurant ID")),
    request_body = crate::openapi::ReservationInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ReservationDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Restaurant or table Not Found",
            body = crate::openapi::ErrorDoc),
        (status = 409, description = "Table already booked", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
    body: Result<Json<ReservationFields>, JsonRejection>,
) -> Result<(StatusCode, Json<reservation::Model>), JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let Json(fields) = body?;
    let r = state.store.create_reservation(restaurant_id, fields).await?;
    info!(
        %restaurant_id,
        reservation_id = %r.id,
        date = %r.date,
        time = %r.time,
        "reservation_created"
    );
    Ok((StatusCode::CREATED, Json(r)))
}

/// Creation order, narrowed by the optional `date` and `status` filters.
#[utoipa::path(
    get, path = "/reservations/{restaurant_id}", tag = "reservations",
    params(("restaurant_id" = String, Path, description = "Restaurant ID"), ReservationQuery),
    responses(
        (status = 200, description = "Matching reservations"),
        (status = 400, description = "Bad filter", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
    query: Result<Query<ReservationQuery>, QueryRejection>,
) -> Result<Json<ListEnvelope<reservation::Model>>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let Query(query) = query?;
    let filter = query.into_filter()?;
    let list = state.store.list_reservations(restaurant_id, &filter).await?;
    Ok(Json(ListEnvelope::new("reservations", list)))
}

#[utoipa::path(
    get, path = "/reservations/{restaurant_id}/{id}", tag = "reservations",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ReservationDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path((restaurant_id, id)): Path<(String, String)>,
) -> Result<Json<reservation::Model>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let id = parse_id(&id, "reservation")?;
    Ok(Json(state.store.get_reservation(restaurant_id, id).await?))
}

#[utoipa::path(
    put, path = "/reservations/{restaurant_id}/{id}", tag = "reservations",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Reservation ID")
    ),
    request_body = crate::openapi::ReservationInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ReservationDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Forbidden status change or table already booked",
            body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path((restaurant_id, id)): Path<(String, String)>,
    body: Result<Json<ReservationFields>, JsonRejection>,
) -> Result<Json<reservation::Model>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let id = parse_id(&id, "reservation")?;
    let Json(fields) = body?;
    Ok(Json(state.store.update_reservation(restaurant_id, id, fields).await?))
}

#[utoipa::path(
    delete, path = "/reservations/{restaurant_id}/{id}", tag = "reservations",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Reservation ID")
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
    let id = parse_id(&id, "reservation")?;
    state.store.delete_reservation(restaurant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post, path = "/reservations/{restaurant_id}/{id}/confirm", tag = "reservations",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Confirmed", body = crate::openapi::ReservationDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 409, description = "Reservation is cancelled", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn confirm(
    State(state): State<AppState>,
    Path((restaurant_id, id)): Path<(String, String)>,
) -> Result<Json<reservation::Model>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let id = parse_id(&id, "reservation")?;
    let r = state.store.confirm_reservation(restaurant_id, id).await?;
    info!(%restaurant_id, reservation_id = %id, "reservation_confirmed");
    Ok(Json(r))
}

#[utoipa::path(
    post, path = "/reservations/{restaurant_id}/{id}/cancel", tag = "reservations",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID"),
        ("id" = String, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Cancelled", body = crate::openapi::ReservationDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn cancel(
    State(state): State<AppState>,
    Path((restaurant_id, id)): Path<(String, String)>,
) -> Result<Json<reservation::Model>, JsonApiError> {
    let restaurant_id = parse_id(&restaurant_id, "restaurant")?;
    let id = parse_id(&id, "reservation")?;
    let r = state.store.cancel_reservation(restaurant_id, id).await?;
    info!(%restaurant_id, reservation_id = %id, "reservation_cancelled");
    Ok(Json(r))
}
