// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::ValidationResult;
use crate::profile::models::InvalidEnumValue;
use crate::services::file_storage::StorageError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    InternalServer(String),
    DatabaseError(sqlx::Error),
    ValidationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, "VALIDATION_ERROR"),
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Helper function to convert ValidationResult to ApiError
impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid {
            ApiError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            let error_messages: Vec<String> = result
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            ApiError::ValidationError(error_messages.join(", "))
        }
    }
}

/// Storage failures keep their user-facing message when the caller can fix
/// the problem. Operator-side failures are logged with full context and
/// surface as a generic message without paths.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::MissingFilename
            | StorageError::UnsupportedType { .. }
            | StorageError::EmptyUpload => ApiError::ValidationError(err.to_string()),
            StorageError::InvalidPath(_) => ApiError::BadRequest("Invalid file path".to_string()),
            StorageError::UploadRead(_) => ApiError::BadRequest(err.to_string()),
            StorageError::NotFound(_) => ApiError::NotFound("File not found".to_string()),
            StorageError::StorageUnavailable { .. } | StorageError::Io { .. } => {
                error!(error = %err, "Storage failure");
                ApiError::InternalServer("Failed to process file".to_string())
            }
        }
    }
}

impl From<InvalidEnumValue> for ApiError {
    fn from(err: InvalidEnumValue) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_storage_validation_errors_are_bad_requests() {
        let err = ApiError::from(StorageError::UnsupportedType {
            allowed: &["jpg", "jpeg", "png", "gif"],
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_io_error_hides_path() {
        let err = ApiError::from(StorageError::Io {
            path: PathBuf::from("/srv/secret/uploads/resumes/x.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        });
        match err {
            ApiError::InternalServer(msg) => assert!(!msg.contains("/srv/secret")),
            other => panic!("unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn test_storage_not_found_maps_to_404() {
        let response =
            ApiError::from(StorageError::NotFound("resumes/x.pdf".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_enum_is_bad_request() {
        let err = "RETIRED"
            .parse::<crate::profile::models::ExperienceStatus>()
            .unwrap_err();
        match ApiError::from(err) {
            ApiError::BadRequest(msg) => assert!(msg.contains("FRESHER, EXPERIENCED")),
            other => panic!("unexpected mapping: {:?}", other),
        }
    }
}
