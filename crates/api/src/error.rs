//! The error envelope returned by every failing endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use uuid::Uuid;

use isotrack_shared::error::AppError;

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Wraps an [`AppError`] for the wire.
///
/// Every error response carries the same envelope:
///
/// ```json
/// { "error": { "code", "message", "userMessage", "traceId" } }
/// ```
///
/// The trace ID is a fresh UUID minted per error and logged server-side,
/// so a user report can be matched to the log line without exposing
/// internals in the response.
#[derive(Debug)]
pub struct ApiError {
    inner: AppError,
    details: Option<Value>,
    field_errors: Option<Value>,
}

impl ApiError {
    /// Attaches structured details to the envelope.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attaches per-field validation errors to the envelope.
    #[must_use]
    pub fn with_field_errors(mut self, field_errors: Value) -> Self {
        self.field_errors = Some(field_errors);
        self
    }
}

impl From<AppError> for ApiError {
    fn from(inner: AppError) -> Self {
        Self {
            inner,
            details: None,
            field_errors: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let trace_id = Uuid::new_v4();
        let status = StatusCode::from_u16(self.inner.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                trace_id = %trace_id,
                code = self.inner.error_code(),
                error = %self.inner,
                "request failed"
            );
        } else {
            tracing::warn!(
                trace_id = %trace_id,
                code = self.inner.error_code(),
                error = %self.inner,
                "request rejected"
            );
        }

        let mut error = json!({
            "code": self.inner.error_code(),
            "message": self.inner.to_string(),
            "userMessage": self.inner.user_message(),
            "traceId": trace_id,
        });
        if let Some(map) = error.as_object_mut() {
            if let Some(details) = self.details {
                map.insert("details".to_string(), details);
            }
            if let Some(field_errors) = self.field_errors {
                map.insert("fieldErrors".to_string(), field_errors);
            }
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let err: ApiError = AppError::NotFound("order abc".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_details_are_optional() {
        let err: ApiError = AppError::Validation("bad input".to_string()).into();
        assert!(err.details.is_none());
        let err = err.with_details(json!({ "field": "quantityMbq" }));
        assert!(err.details.is_some());
    }
}
