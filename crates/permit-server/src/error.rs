//! Service error taxonomy.
//!
//! Every failure is recovered at the request boundary: it maps to a status
//! code and a JSON body, never to a process exit, and nothing is retried.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use permit_policy::{AccessDeniedKind, FieldViolation};
use permit_store::StoreError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid session on a path that needs one.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The policy engine denied an authenticated caller.
    #[error("not authorized: {0}")]
    Forbidden(String),

    /// The payload violated field constraints.
    #[error("validation failed")]
    ValidationFailed(Vec<FieldViolation>),

    /// Row not found within the caller's row scope.
    #[error("not found")]
    NotFound,

    /// The operation conflicts with current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store failed; the message is passed through to the caller.
    #[error("store operation failed: {0}")]
    Store(String),

    /// Anything else. Logged; the caller gets a generic message.
    #[error("unexpected error")]
    Unexpected(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Denied(denied) => match denied.kind {
                AccessDeniedKind::AuthenticationRequired => ApiError::AuthenticationRequired,
                _ => ApiError::Forbidden(denied.message),
            },
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::InvalidRow(msg) => ApiError::Store(msg),
            StoreError::Database(e) => ApiError::Store(e.to_string()),
            StoreError::Migrate(e) => ApiError::Store(e.to_string()),
        }
    }
}

impl From<Vec<FieldViolation>> for ApiError {
    fn from(violations: Vec<FieldViolation>) -> Self {
        ApiError::ValidationFailed(violations)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Store(_) | ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::ValidationFailed(violations) => json!({
                "error": "validation failed",
                "violations": violations,
            }),
            ApiError::Unexpected(err) => {
                tracing::error!(error = %err, "unexpected error");
                json!({ "error": "internal error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
