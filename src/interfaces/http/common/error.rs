//! Domain error → HTTP response mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::ApiResponse;
use crate::domain::DomainError;

/// Error half of every handler result
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiResponse<()>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiResponse::error(message),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(fields) => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: ApiResponse::error(format!("Validation failed: {}", fields))
                    .with_field_errors(fields.as_map().clone()),
            },
            e @ DomainError::RoomUnavailable { .. } => {
                Self::new(StatusCode::CONFLICT, e.to_string())
            }
            e @ DomainError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            DomainError::Unauthorized(reason) => Self::new(StatusCode::FORBIDDEN, reason),
            DomainError::Persistence(detail) => {
                error!("Persistence failure: {}", detail);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
