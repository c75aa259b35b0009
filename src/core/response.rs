//! Successful responses
//!
//! [`ApiResponse`] pairs a JSON body with a status code (200 unless
//! overridden). Failures go through [`ApiError`], so a controller operation
//! returns [`ApiResult`] and axum renders either side.

use super::error::ApiError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

/// Result of a controller operation
pub type ApiResult = Result<ApiResponse, ApiError>;

/// A JSON body with its status code
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    body: Value,
}

impl ApiResponse {
    /// 200 with the given body
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    /// 200 with `{"message": ...}`
    pub fn message(message: &str) -> Self {
        Self::ok(json!({ "message": message }))
    }

    /// Override the status code
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
