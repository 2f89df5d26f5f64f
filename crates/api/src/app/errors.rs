use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use cinedex_core::{DomainError, Violation};
use cinedex_infra::DatabaseError;

use crate::app::dto::ValidationErrorsResponse;

/// Every way a resource request can fail, mapped onto one status code each.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body broke the resource's rule table (422, all violations listed).
    #[error("request body failed validation")]
    Validation(Vec<Violation>),

    /// No row for the addressed id (404, empty body).
    #[error("not found")]
    NotFound,

    /// Anything the persistence layer reported (500, generic body).
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(violations) => ApiError::Validation(violations),
            // An id that does not parse cannot address any row.
            DomainError::InvalidId(_) => ApiError::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(validation_errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorsResponse { validation_errors }),
            )
                .into_response(),
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Database(e) => {
                tracing::error!(error = %e, "database operation failed");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error",
                )
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
