// Common DTOs and error mapping for the public API
//
// These types are shared across multiple API endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use eventline_core::ApprovalError;

/// Response wrapper for list endpoints.
/// All list endpoints return responses wrapped in a `data` field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    /// Array of items returned by the list operation.
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Error body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// API-facing error wrapper mapping the domain taxonomy onto HTTP statuses:
/// InvalidInput → 400, Unauthorized → 403, NotFound → 404, Conflict → 409,
/// everything else → 500.
#[derive(Debug)]
pub struct ApiError(pub ApprovalError);

impl From<ApprovalError> for ApiError {
    fn from(err: ApprovalError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ApprovalError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApprovalError::Unauthorized(_) => StatusCode::FORBIDDEN,
            ApprovalError::NotFound(_) => StatusCode::NOT_FOUND,
            ApprovalError::Conflict { .. } => StatusCode::CONFLICT,
            ApprovalError::Storage(_) | ApprovalError::Internal(_) => {
                tracing::error!("request failed: {}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        let cases = [
            (ApprovalError::invalid("x"), StatusCode::BAD_REQUEST),
            (ApprovalError::unauthorized("x"), StatusCode::FORBIDDEN),
            (ApprovalError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApprovalError::conflict("PENDING"), StatusCode::CONFLICT),
            (
                ApprovalError::storage("down"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
