//! HTTP error responses.
//!
//! Every failure leaves the API as
//! `{ "error": { "code": "...", "message": "...", "fields": [...] } }`.
//! Internal failures are logged here and answered without details.

use crate::configs::ConfigsError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use homeboard_core::{CoreError, FieldError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    Configs(ConfigsError),
    /// The request could not be decoded (bad body, content type, path or
    /// query string).
    InvalidRequest {
        status: StatusCode,
        message: String,
    },
    Unauthorized,
    RateLimited,
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<ConfigsError> for ApiError {
    fn from(err: ConfigsError) -> Self {
        match err {
            ConfigsError::Core(core) => Self::Core(core),
            other => Self::Configs(other),
        }
    }
}

macro_rules! from_rejection {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    Self::InvalidRequest {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    }
                }
            }
        )+
    };
}

from_rejection!(JsonRejection, PathRejection, QueryRejection);

impl ApiError {
    fn parts(self) -> (StatusCode, &'static str, String, Vec<FieldError>) {
        match self {
            Self::Core(err) => match err {
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "not_found", err.to_string(), Vec::new())
                }
                CoreError::Conflict { .. } => {
                    (StatusCode::CONFLICT, "conflict", err.to_string(), Vec::new())
                }
                CoreError::Validation(fields) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "validation_failed",
                    "validation failed".to_string(),
                    fields,
                ),
                CoreError::InvalidPath(_) | CoreError::LegacyFormat(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "invalid_input",
                    err.to_string(),
                    Vec::new(),
                ),
                other => internal(other.to_string()),
            },
            Self::Configs(err) => match err {
                ConfigsError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "not_found", err.to_string(), Vec::new())
                }
                ConfigsError::InvalidName(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "invalid_input",
                    err.to_string(),
                    Vec::new(),
                ),
                other => internal(other.to_string()),
            },
            Self::InvalidRequest { status, message } => {
                (status, "invalid_request", message, Vec::new())
            }
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "missing or invalid API key".to_string(),
                Vec::new(),
            ),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "too many requests".to_string(),
                Vec::new(),
            ),
            Self::Internal(detail) => internal(detail),
        }
    }
}

fn internal(detail: String) -> (StatusCode, &'static str, String, Vec<FieldError>) {
    tracing::error!(error = %detail, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        "internal server error".to_string(),
        Vec::new(),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = self.parts();
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                fields,
            },
        };
        (status, Json(body)).into_response()
    }
}
