//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("conflict: {0}")]
    Conflict(String),
    /// Update matched no row although the record still exists.
    #[error("concurrency conflict: {0}")]
    Concurrency(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
}

impl AppError {
    /// Maps unique-constraint violations to `Conflict`; everything else stays a database error.
    pub fn from_insert(e: sqlx::Error, id: i32) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::Conflict(format!("movie {} already exists", id));
            }
        }
        AppError::Db(e)
    }

    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    (StatusCode::NOT_FOUND, "not_found")
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            }
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::Concurrency(_) => (StatusCode::INTERNAL_SERVER_ERROR, "concurrency_conflict"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::NotFound("1".into()).status().0, StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadRequest("x".into()).status().0, StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("x".into()).status().0, StatusCode::CONFLICT);
        assert_eq!(AppError::PayloadTooLarge("x".into()).status().0, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            AppError::Concurrency("x".into()).status(),
            (StatusCode::INTERNAL_SERVER_ERROR, "concurrency_conflict")
        );
        assert_eq!(AppError::Db(sqlx::Error::RowNotFound).status().0, StatusCode::NOT_FOUND);
        let config = AppError::from(ConfigError::Invalid {
            key: "MOVIES_SCHEMA",
            message: "bad".into(),
        });
        assert_eq!(config.status(), (StatusCode::INTERNAL_SERVER_ERROR, "config_error"));
        assert_eq!(
            AppError::Db(sqlx::Error::PoolTimedOut).status(),
            (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
        );
    }

    #[test]
    fn insert_errors_other_than_unique_violation_stay_db() {
        let e = AppError::from_insert(sqlx::Error::PoolClosed, 7);
        assert!(matches!(e, AppError::Db(sqlx::Error::PoolClosed)));
    }
}
