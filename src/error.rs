//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// PostgreSQL SQLSTATE for a NOT NULL violation.
const NOT_NULL_VIOLATION: &str = "23502";
/// PostgreSQL SQLSTATE for a CHECK constraint violation.
const CHECK_VIOLATION: &str = "23514";

/// Message returned for every 500; the cause is logged instead.
pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(String),
    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(sqlx::Error),
    #[error("unhandled: {0}")]
    Unhandled(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Db(_) | AppError::Unhandled(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Config(_) | AppError::Db(_) | AppError::Unhandled(_) => {
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

/// NOT NULL and CHECK violations are caller mistakes; everything else from the
/// database is unhandled.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if let Some(code) = db.code() {
                if code == NOT_NULL_VIOLATION || code == CHECK_VIOLATION {
                    return AppError::Validation(db.message().to_string());
                }
            }
        }
        AppError::Db(err)
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub status: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                message: self.public_message(),
                status: status.as_u16(),
            },
        };
        (status, Json(body)).into_response()
    }
}
