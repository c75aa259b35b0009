//! Typed errors for the resource layer
//!
//! - [`ApiError`]: the fixed set of conditions a request can end in, each
//!   with its HTTP status and JSON body
//! - [`StoreError`]: failures reported by an entity store
//! - [`ConfigError`]: failures loading configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use skeleton::prelude::*;
//!
//! async fn show(store: &impl EntityStore, id: &str) -> Result<Record, ApiError> {
//!     store
//!         .find(id, &[])
//!         .await
//!         .map_err(ApiError::from_store)?
//!         .ok_or_else(ApiError::not_found)
//! }
//! ```

use super::validation::ValidationMessages;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Outcome of a request that did not succeed
///
/// Simple conditions render as `{"error": {"http_code", "message"}}`;
/// validation failures render as `{"errors": {field: [messages]}}`. The two
/// shapes are never combined.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 403
    #[error("{0}")]
    Forbidden(String),

    /// 500
    #[error("{0}")]
    InternalError(String),

    /// 404
    #[error("{0}")]
    NotFound(String),

    /// 401
    #[error("{0}")]
    Unauthorized(String),

    /// 400
    #[error("{0}")]
    WrongArguments(String),

    /// 422
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(ValidationMessages),

    /// 501
    #[error("{0}")]
    NotImplemented(String),
}

impl ApiError {
    pub fn forbidden() -> Self {
        ApiError::Forbidden("Forbidden".to_string())
    }

    pub fn internal_error() -> Self {
        ApiError::InternalError("Internal Error".to_string())
    }

    pub fn not_found() -> Self {
        ApiError::NotFound("Resource Not Found".to_string())
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Unauthorized".to_string())
    }

    pub fn wrong_arguments() -> Self {
        ApiError::WrongArguments("Wrong Arguments".to_string())
    }

    pub fn not_implemented() -> Self {
        ApiError::NotImplemented("Not implemented".to_string())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::WrongArguments(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }

    /// Message of a simple error; `None` for validation failures
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Forbidden(m)
            | ApiError::InternalError(m)
            | ApiError::NotFound(m)
            | ApiError::Unauthorized(m)
            | ApiError::WrongArguments(m)
            | ApiError::NotImplemented(m) => Some(m),
            ApiError::Validation(_) => None,
        }
    }

    /// JSON body sent to the client
    pub fn body(&self) -> Value {
        match self {
            ApiError::Validation(messages) => json!({ "errors": messages }),
            other => serde_json::to_value(ErrorEnvelope {
                error: ErrorBody {
                    http_code: other.status_code().as_u16(),
                    message: other.message().unwrap_or_default(),
                },
            })
            .unwrap_or_default(),
        }
    }

    /// Map a store failure onto the client-facing taxonomy
    ///
    /// Backend details never reach the client; they are logged here.
    pub fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::UnknownField { .. } | StoreError::InvalidAttributes { .. } => {
                ApiError::WrongArguments(err.to_string())
            }
            StoreError::Backend(source) => {
                tracing::error!(error = %source, "entity store failure");
                ApiError::internal_error()
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    http_code: u16,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Errors reported by an [`EntityStore`](crate::core::store::EntityStore)
#[derive(Debug, Error)]
pub enum StoreError {
    /// Lookup on a field the store does not know
    #[error("Unknown field '{field}'")]
    UnknownField { field: String },

    /// Attributes the store cannot persist
    #[error("Invalid attributes: {message}")]
    InvalidAttributes { message: String },

    /// Anything else coming from the storage backend
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Duplicate resource '{name}' in config")]
    DuplicateResource { name: String },

    #[error("Invalid resource '{name}': {message}")]
    InvalidResource { name: String, message: String },
}
