//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::db::DbError;
use crate::service::ServiceError;

/// Error body shape: `{"detail": "<message>"}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// Wrapper turning [`ServiceError`] into an HTTP response.
///
/// Validation failures map to 400, a missing game to 404. Storage failures
/// map to 500 with a generic detail; the underlying error is logged, never
/// exposed.
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        Self(ServiceError::Db(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            ServiceError::GameNotFound => (StatusCode::NOT_FOUND, self.0.to_string()),
            ServiceError::Db(err) => {
                error!(error = %err, "Storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            _ => (StatusCode::BAD_REQUEST, self.0.to_string()),
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}
