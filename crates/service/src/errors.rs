use models::errors::{FieldErrors, ModelError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(FieldErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }

    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }

    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::InvalidState(_) => "invalid_state",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Unavailable(_) => "unavailable",
            ServiceError::Db(_) => "db",
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(fields) => ServiceError::Validation(fields),
            ModelError::InvalidState(msg) => ServiceError::InvalidState(msg),
            ModelError::Db(err) => err.into(),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
            return ServiceError::Conflict(msg);
        }
        match e {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
                ServiceError::Unavailable(e.to_string())
            }
            DbErr::RecordNotFound(what) => ServiceError::NotFound(what),
            DbErr::RecordNotUpdated => ServiceError::NotFound("record no longer exists".into()),
            other => ServiceError::Db(other.to_string()),
        }
    }
}
