//! Assistant endpoints. Upstream failures never surface here: the service
//! answers from the fallback and `source` says which one was used.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use service::ai::{
    domain::{
        ChatRequest, MenuRecommendation, MenuRecommendationRequest,
        ReservationRecommendationRequest, ReservationSuggestion,
    },
    Source,
};

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Recommendations<T> {
    pub recommendations: Vec<T>,
    pub count: usize,
    pub source: Source,
}

impl<T> Recommendations<T> {
    fn new(recommendations: Vec<T>, source: Source) -> Self {
        Self {
            count: recommendations.len(),
            recommendations,
            source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub source: Source,
}

#[utoipa::path(
    post, path = "/ai/recommendations/menu", tag = "ai",
    request_body = crate::openapi::MenuRecommendationRequestDoc,
    responses(
        (status = 200, description = "Recommended dishes"),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn recommend_menu(
    State(state): State<AppState>,
    body: Result<Json<MenuRecommendationRequest>, JsonRejection>,
) -> Result<Json<Recommendations<MenuRecommendation>>, JsonApiError> {
    let Json(req) = body?;
    let answer = state.ai.recommend_menu(&state.store, req).await?;
    Ok(Json(Recommendations::new(answer.value, answer.source)))
}

#[utoipa::path(
    post, path = "/ai/recommendations/reservation", tag = "ai",
    request_body = crate::openapi::ReservationRecommendationRequestDoc,
    responses(
        (status = 200, description = "Suggested slots"),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn recommend_reservation(
    State(state): State<AppState>,
    body: Result<Json<ReservationRecommendationRequest>, JsonRejection>,
) -> Result<Json<Recommendations<ReservationSuggestion>>, JsonApiError> {
    let Json(req) = body?;
    let answer = state.ai.recommend_reservation(&state.store, req).await?;
    Ok(Json(Recommendations::new(answer.value, answer.source)))
}

#[utoipa::path(
    post, path = "/ai/chat", tag = "ai",
    request_body = crate::openapi::ChatRequestDoc,
    responses(
        (status = 200, description = "Assistant reply"),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Restaurant Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, JsonApiError> {
    let Json(req) = body?;
    let answer = state.ai.chat(&state.store, req).await?;
    Ok(Json(ChatReply {
        response: answer.value,
        source: answer.source,
    }))
}
