use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

/// Plain `{message}` payload.
#[derive(Debug, Serialize, Clone)]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{success: false, message}` payload used by the intake and cron endpoints.
#[derive(Debug, Serialize, Clone)]
pub struct ApiFailure {
    pub success: bool,
    pub message: String,
}

/// `{error}` payload used by the admin read endpoints.
#[derive(Debug, Serialize, Clone)]
pub struct ApiError {
    pub error: String,
}

pub fn json_failure(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiFailure>) {
    (
        status,
        Json(ApiFailure {
            success: false,
            message: message.into(),
        }),
    )
}

pub fn json_error(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            error: error.into(),
        }),
    )
}
