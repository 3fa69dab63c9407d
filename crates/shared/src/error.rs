//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested status change is not on the transition allow-list.
    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    /// Approval request has already been approved or rejected.
    #[error("Request not pending: {0}")]
    RequestNotPending(String),

    /// Acted-on approval step is not the one currently pending.
    #[error("Step mismatch: {0}")]
    StepMismatch(String),

    /// Duplicate entry (unique constraint violation).
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Write conflict (stale row version).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Customer license has expired.
    #[error("License expired: {0}")]
    LicenseExpired(String),

    /// Production capacity exhausted for the requested date.
    #[error("Capacity full: {0}")]
    CapacityFull(String),

    /// Batch failed quality control.
    #[error("QC failed: {0}")]
    QcFailed(String),

    /// Batch has not been released by a qualified person.
    #[error("Batch not released: {0}")]
    BatchNotReleased(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_)
            | Self::InvalidTransition(_)
            | Self::RequestNotPending(_)
            | Self::StepMismatch(_)
            | Self::LicenseExpired(_)
            | Self::BatchNotReleased(_) => 400,
            Self::DuplicateEntry(_) | Self::Conflict(_) => 409,
            Self::CapacityFull(_) | Self::QcFailed(_) => 422,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidTransition(_) => "INVALID_STATUS_TRANSITION",
            Self::RequestNotPending(_) => "REQUEST_NOT_PENDING",
            Self::StepMismatch(_) => "STEP_MISMATCH",
            Self::DuplicateEntry(_) => "DUPLICATE_ENTRY",
            Self::Conflict(_) => "CONFLICT",
            Self::LicenseExpired(_) => "LICENSE_EXPIRED",
            Self::CapacityFull(_) => "CAPACITY_FULL",
            Self::QcFailed(_) => "QC_FAILED",
            Self::BatchNotReleased(_) => "BATCH_NOT_RELEASED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns a human-readable message safe to show to end users.
    ///
    /// Internal details (database messages, stack context) never leak here.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(_) => "Please sign in to continue.".to_string(),
            Self::Forbidden(_) => "You do not have permission to perform this action.".to_string(),
            Self::NotFound(_) => "The requested resource was not found.".to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::InvalidTransition(_) => {
                "This status change is not allowed from the current status.".to_string()
            }
            Self::RequestNotPending(_) => {
                "This approval request has already been decided.".to_string()
            }
            Self::StepMismatch(_) => {
                "This is not the step currently awaiting approval.".to_string()
            }
            Self::DuplicateEntry(_) => "A record with these details already exists.".to_string(),
            Self::Conflict(_) => {
                "The record was modified by someone else. Please reload and retry.".to_string()
            }
            Self::LicenseExpired(_) => {
                "The customer's license has expired. Orders cannot be placed.".to_string()
            }
            Self::CapacityFull(_) => {
                "Production capacity for the requested date is full.".to_string()
            }
            Self::QcFailed(_) => "The batch did not pass quality control.".to_string(),
            Self::BatchNotReleased(_) => {
                "The batch has not been released and cannot be shipped.".to_string()
            }
            Self::Database(_) | Self::Internal(_) => {
                "An unexpected error occurred. Please try again later.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Unauthorized(String::new()), 401, "UNAUTHORIZED")]
    #[case(AppError::Forbidden(String::new()), 403, "FORBIDDEN")]
    #[case(AppError::NotFound(String::new()), 404, "NOT_FOUND")]
    #[case(AppError::Validation(String::new()), 400, "VALIDATION_ERROR")]
    #[case(AppError::InvalidTransition(String::new()), 400, "INVALID_STATUS_TRANSITION")]
    #[case(AppError::RequestNotPending(String::new()), 400, "REQUEST_NOT_PENDING")]
    #[case(AppError::StepMismatch(String::new()), 400, "STEP_MISMATCH")]
    #[case(AppError::DuplicateEntry(String::new()), 409, "DUPLICATE_ENTRY")]
    #[case(AppError::Conflict(String::new()), 409, "CONFLICT")]
    #[case(AppError::LicenseExpired(String::new()), 400, "LICENSE_EXPIRED")]
    #[case(AppError::CapacityFull(String::new()), 422, "CAPACITY_FULL")]
    #[case(AppError::QcFailed(String::new()), 422, "QC_FAILED")]
    #[case(AppError::BatchNotReleased(String::new()), 400, "BATCH_NOT_RELEASED")]
    #[case(AppError::Database(String::new()), 500, "DATABASE_ERROR")]
    #[case(AppError::Internal(String::new()), 500, "INTERNAL_ERROR")]
    fn test_error_wire_mapping(
        #[case] err: AppError,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = AppError::Database("connection refused at 10.0.0.3:5432".to_string());
        assert!(!err.user_message().contains("10.0.0.3"));

        let err = AppError::Internal("panic in handler".to_string());
        assert!(!err.user_message().contains("panic"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("order".into()).to_string(),
            "Not found: order"
        );
        assert_eq!(
            AppError::Conflict("stale version".into()).to_string(),
            "Conflict: stale version"
        );
    }
}
