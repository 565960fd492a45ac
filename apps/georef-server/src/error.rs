//! Error types for the georeferencing server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use georef_core::GeorefError;
use serde::Serialize;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Georef(#[from] GeorefError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl ServerError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ServerError::Georef(err) => match err {
                GeorefError::PasswordProtected => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "PASSWORD_PROTECTED")
                }
                GeorefError::InvalidPdf(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_PDF"),
                GeorefError::Extraction(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED")
                }
                GeorefError::InvertedBounds => (StatusCode::BAD_REQUEST, "INVERTED_BOUNDS"),
                GeorefError::InvalidCoordinate { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_COORDINATE")
                }
                GeorefError::InvalidMap(_) => (StatusCode::BAD_REQUEST, "INVALID_MAP"),
                GeorefError::DegenerateBounds { .. } => {
                    (StatusCode::BAD_REQUEST, "DEGENERATE_BOUNDS")
                }
                GeorefError::InsufficientPoints { .. } => {
                    (StatusCode::BAD_REQUEST, "INSUFFICIENT_POINTS")
                }
                GeorefError::NoCoordinatesFound => (StatusCode::BAD_REQUEST, "NO_COORDINATES"),
                GeorefError::Projection(_)
                | GeorefError::InvalidPattern(_)
                | GeorefError::Config(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
                }
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
