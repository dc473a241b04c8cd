use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::guidance::GuidanceError;
use crate::prayer::WallError;

/// Error returned by every route handler, rendered as `{ "error": "..." }`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    MethodNotAllowed,
    Upstream(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
            }
            ApiError::Upstream(msg) => {
                tracing::error!("upstream error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to get response from AI service".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<GuidanceError> for ApiError {
    fn from(e: GuidanceError) -> Self {
        match e {
            GuidanceError::InvalidInput(msg) => ApiError::BadRequest(msg.to_string()),
            GuidanceError::Upstream(e) => ApiError::Upstream(e.to_string()),
        }
    }
}

impl From<WallError> for ApiError {
    fn from(e: WallError) -> Self {
        match e {
            WallError::NotFound(_) => ApiError::NotFound(e.to_string()),
            WallError::UnknownType(_) | WallError::InvalidLength => {
                ApiError::BadRequest(e.to_string())
            }
        }
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(e: minijinja::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}
