/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - 401 / 403 は middleware::auth::entry_point の終端ハンドラに委譲する
 */
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::middleware::auth::entry_point;
use crate::repos::error::RepoError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error("{code}: {message}")]
    MalformedRequest { code: &'static str, message: String },

    #[error("conflict: {0}")]
    Conflict(&'static str),

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn malformed(code: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InvalidCredentials => {
                return entry_point::invalid_credentials();
            }
            AppError::Unauthenticated => {
                return entry_point::authentication_entry_point();
            }
            AppError::Forbidden => {
                return entry_point::access_denied_handler();
            }
            AppError::MalformedRequest { code, message } => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(code, message))
            }
            AppError::Conflict(what) => (
                StatusCode::CONFLICT,
                ErrorResponse::new("CONFLICT", format!("{what} already exists.")),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", format!("{resource} not found.")),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("INTERNAL_SERVER_ERROR", "internal server error"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::Conflict("user"),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::malformed("MALFORMED_REQUEST", e.body_text())
    }
}
