/*
 * Responsibility
 * - The one error type handlers and services return (AppError)
 * - IntoResponse: status code + uniform JSON body {"error": {"code", "message"}}
 * - Conversions from store / id errors; store details are logged, never returned
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::object_id::IdError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    Validation { code: &'static str, message: String },
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),
    #[error("forbidden: {0}")]
    Forbidden(&'static str),
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("{code}: {message}")]
    Conflict { code: &'static str, message: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::validation("VALIDATION", message)
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AppError::Validation { code, message } => (code, message),
            AppError::Unauthorized(reason) => ("UNAUTHORIZED", reason.to_string()),
            AppError::Forbidden(reason) => ("FORBIDDEN", reason.to_string()),
            AppError::NotFound { resource } => ("NOT_FOUND", format!("{resource} not found.")),
            AppError::Conflict { code, message } => (code, message),
            AppError::Internal => ("INTERNAL_SERVER_ERROR", "internal server error".into()),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict { constraint } => {
                tracing::debug!(%constraint, "unique constraint violated");
                AppError::conflict("CONFLICT", "resource already exists")
            }
            other => {
                tracing::error!(error = ?other, "store operation failed");
                AppError::Internal
            }
        }
    }
}

impl From<IdError> for AppError {
    fn from(e: IdError) -> Self {
        // Client supplied a malformed id (path or body)
        AppError::validation("INVALID_ID", e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_their_status_codes() {
        assert_eq!(AppError::invalid("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Unauthorized("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("post").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::conflict("EMAIL_TAKEN", "x").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_failures_do_not_leak_details() {
        let err: AppError = RepoError::Corrupt("bad id \"zz\"".into()).into();
        assert!(matches!(err, AppError::Internal));
        assert_eq!(err.to_string(), "internal server error");
    }

    #[test]
    fn malformed_ids_are_validation_errors() {
        let err: AppError = IdError::InvalidCharacter.into();
        match err {
            AppError::Validation { code, .. } => assert_eq!(code, "INVALID_ID"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
