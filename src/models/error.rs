use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Stable wire shape for every error the API emits.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// The API distinguishes exactly two client-visible failure kinds: a
/// malformed request (400, stable message) and everything else (500,
/// message content not contractually stable). Provisioning degradation
/// is never surfaced here; it only shows up in logs and model state.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Missing image data")]
    MissingImage,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson | ApiError::MissingImage => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<base64::DecodeError> for ApiError {
    fn from(e: base64::DecodeError) -> Self {
        ApiError::Internal(format!("Invalid base64 image data: {}", e))
    }
}

impl From<image::ImageError> for ApiError {
    fn from(e: image::ImageError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_request_messages_are_stable() {
        assert_eq!(ApiError::InvalidJson.to_string(), "Invalid JSON");
        assert_eq!(ApiError::MissingImage.to_string(), "Missing image data");
    }

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::InvalidJson.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingImage.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
