use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{BatchOutcome, StoreError};
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::json;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `NOT_FOUND`, `PARTIAL_BATCH_FAILURE`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Month must be between 1 and 12")]
    pub message: String,
    /// Extra context. Present for `PARTIAL_BATCH_FAILURE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl ErrorBody {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    NotFound(String),
    /// Some writes of an attendance submission failed. The committed writes stay.
    PartialBatchFailure(BatchOutcome),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("VALIDATION_ERROR", msg),
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("TOKEN_MISSING", "Authentication required"),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("TOKEN_INVALID", "Invalid or expired token"),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("INVALID_CREDENTIALS", "Invalid username or password"),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new("NOT_FOUND", msg)),
            AppError::PartialBatchFailure(outcome) => {
                let failed: Vec<_> = outcome
                    .failed
                    .iter()
                    .map(|f| {
                        json!({ "studentId": f.student_id, "reason": failure_reason(&f.error) })
                    })
                    .collect();
                let mut body = ErrorBody::new(
                    "PARTIAL_BATCH_FAILURE",
                    format!(
                        "{} of {} attendance updates failed",
                        outcome.failed.len(),
                        outcome.failed.len() + outcome.succeeded.len()
                    ),
                );
                body.details = Some(json!({
                    "succeeded": outcome.succeeded,
                    "failed": failed,
                }));
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("INTERNAL_ERROR", "An unexpected error occurred"),
                )
            }
        }
    }
}

fn failure_reason(err: &StoreError) -> &'static str {
    match err {
        StoreError::NotEnrolled { .. } => "not enrolled",
        StoreError::Database(_) => "write failed",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotEnrolled { .. } => AppError::Validation(err.to_string()),
            StoreError::Database(detail) => AppError::Internal(detail),
        }
    }
}
