use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use sdesk_core::error::{
    AppError, INVALID_TRANSITION, NOT_FOUND, UNKNOWN_PRIORITY, VALIDATION_FAILED,
};

pub const UNAUTHORIZED: &str = "UNAUTHORIZED";

/// Wire wrapper: maps stable `AppError` codes onto HTTP statuses and ships
/// the error body unchanged, so the presentation layer sees exactly what the
/// core produced.
#[derive(Debug)]
pub struct ApiError(pub AppError);

fn status_for(code: &str) -> StatusCode {
    match code {
        NOT_FOUND => StatusCode::NOT_FOUND,
        INVALID_TRANSITION => StatusCode::CONFLICT,
        UNKNOWN_PRIORITY => StatusCode::BAD_REQUEST,
        VALIDATION_FAILED => StatusCode::UNPROCESSABLE_ENTITY,
        UNAUTHORIZED => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0.code);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = %self.0.code, message = %self.0.message, "internal error");
        }
        (status, Json(json!({ "error": self.0 }))).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

pub fn unauthorized(message: &str) -> ApiError {
    ApiError(AppError::new(UNAUTHORIZED, message))
}
