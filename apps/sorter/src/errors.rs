use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised by the sorter itself.
///
/// Comparator failures abort the run immediately; no partial result is produced.
#[derive(Debug, Error)]
pub enum SortError {
    #[error("Invalid sort options: {0}")]
    InvalidOptions(String),

    #[error("Values cannot be compared: {0}")]
    Incomparable(String),

    #[error("Comparator failed: {0}")]
    Comparator(#[from] anyhow::Error),

    #[error("Failed to start blocking runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// HTTP-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Sort error: {0}")]
    Sort(#[from] SortError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Sort(e @ (SortError::InvalidOptions(_) | SortError::Incomparable(_))) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Sort(e) => {
                tracing::error!("Sort error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "The sorter gave up unexpectedly".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_options_maps_to_bad_request() {
        let resp = AppError::from(SortError::InvalidOptions("nope".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_comparator_failure_maps_to_internal_error() {
        let err = SortError::Comparator(anyhow::anyhow!("boom"));
        let resp = AppError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
