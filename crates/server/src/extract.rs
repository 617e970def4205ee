//! Extractors whose rejections come back as `ApiError` JSON, like every
//! other failure the API reports.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared::error::{ApiError, ErrorCode};

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiRejection))]
pub(crate) struct ApiJson<T>(pub(crate) T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiRejection))]
pub(crate) struct ApiPath<T>(pub(crate) T);

#[derive(Debug)]
pub(crate) struct ApiRejection {
    status: StatusCode,
    error: ApiError,
}

impl ApiRejection {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
            ErrorCode::Capacity
        } else if status.is_server_error() {
            ErrorCode::Internal
        } else {
            ErrorCode::Validation
        };
        Self {
            status,
            error: ApiError::new(code, message),
        }
    }
}

impl From<JsonRejection> for ApiRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiRejection {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

/// The body limit layer answers oversized requests with plain text before
/// any extractor runs; this rewrites those answers as `ApiError` JSON.
pub(crate) async fn payload_too_large_as_json(response: Response) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }
    ApiRejection::new(StatusCode::PAYLOAD_TOO_LARGE, "request body is too large").into_response()
}
