//! Error-to-response mapping at the HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use folio_store_core::{SaveError, StoreError, WriteOutcome};

/// Response-side error: the failure plus any writes that had already been
/// committed when it happened. Partial success stays visible to the caller.
#[derive(Debug)]
pub struct ApiError {
    pub error: StoreError,
    pub completed: Vec<String>,
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        Self {
            error,
            completed: Vec::new(),
        }
    }
}

impl From<SaveError> for ApiError {
    fn from(err: SaveError) -> Self {
        Self {
            completed: err.completed.iter().map(WriteOutcome::note).collect(),
            error: err.source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody {
            error: String,
            code: &'static str,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            completed: Vec<String>,
        }

        let (status, code) = match &self.error {
            StoreError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            StoreError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED")
            }
            StoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION"),
            StoreError::BackendRead { .. } => (StatusCode::BAD_GATEWAY, "BACKEND_READ"),
            StoreError::BackendWrite { .. } if self.error.is_conflict() => {
                (StatusCode::CONFLICT, "WRITE_CONFLICT")
            }
            StoreError::BackendWrite { .. } => (StatusCode::BAD_GATEWAY, "BACKEND_WRITE"),
            StoreError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };

        let body = ErrorBody {
            error: self.error.to_string(),
            code,
            completed: self.completed,
        };

        (status, axum::Json(body)).into_response()
    }
}
