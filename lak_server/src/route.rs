//! HTTP routes. Errors render as JSON `{"error": ...}` bodies.

pub mod ics;
pub mod schedule;
pub mod streets;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error payload shared by all API routes.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An API error carrying the HTTP status alongside its message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: &str) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: String::from(message),
        }
    }

    pub fn not_found(message: &str) -> Self {
        ApiError {
            status: StatusCode::NOT_FOUND,
            message: String::from(message),
        }
    }

    pub fn internal<E: std::fmt::Display>(error: E) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// The `street` parameter is required and must be non-empty.
pub fn require_street(street: &Option<String>) -> Result<&str, ApiError> {
    match street.as_deref() {
        Some(street) if !street.is_empty() => Ok(street),
        _ => Err(ApiError::bad_request("street parameter required")),
    }
}
