use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::FieldErrors;
use serde::Serialize;
use service::ServiceError;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Error body: `{"error": <title>, "detail": <message>, "fields": [{"field", "message"}]}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
    pub fields: Option<FieldErrors>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self {
            status,
            title,
            detail,
            fields: None,
        }
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            Some(format!("{what} not found")),
        )
    }

    pub fn validation(fields: FieldErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            title: "Validation Error",
            detail: Some(fields.to_string()),
            fields: Some(fields),
        }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(fields) => Self::validation(fields),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::InvalidState(msg) => {
                Self::new(StatusCode::CONFLICT, "Invalid State", Some(msg))
            }
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            ServiceError::Unavailable(msg) => {
                error!(error = %msg, "store unavailable");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Store Unavailable",
                    Some("the data store is unavailable".into()),
                )
            }
            ServiceError::Db(msg) => {
                error!(error = %msg, "store error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None)
            }
        }
    }
}

impl From<models::errors::ModelError> for JsonApiError {
    fn from(e: models::errors::ModelError) -> Self {
        ServiceError::from(e).into()
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Validation Error",
            Some(e.body_text()),
        )
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(e: QueryRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Validation Error",
            Some(e.body_text()),
        )
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.title,
            detail: self.detail.as_deref(),
            fields: self.fields.as_ref(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Path ids that are not UUIDs cannot name anything, so they are reported as absent.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, JsonApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| JsonApiError::not_found(what))
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] configs::ConfigError),
    #[error("database: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(std::io::Error),
}
