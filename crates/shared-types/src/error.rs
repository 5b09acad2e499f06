use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorization of application errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AppErrorKind {
    NotFound,
    BadRequest,
    RateLimited,
    /// The search engine (or another upstream) returned a non-retryable error.
    Upstream,
    InternalError,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppErrorKind::NotFound => write!(f, "NotFound"),
            AppErrorKind::BadRequest => write!(f, "BadRequest"),
            AppErrorKind::RateLimited => write!(f, "RateLimited"),
            AppErrorKind::Upstream => write!(f, "Upstream"),
            AppErrorKind::InternalError => write!(f, "InternalError"),
        }
    }
}

/// Structured application error used across server and client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::BadRequest,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::Upstream,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: AppErrorKind::InternalError,
            message: message.into(),
        }
    }

    #[cfg_attr(not(feature = "server"), allow(dead_code))]
    fn status_code_u16(&self) -> u16 {
        match self.kind {
            AppErrorKind::NotFound => 404,
            AppErrorKind::BadRequest => 400,
            AppErrorKind::RateLimited => 429,
            AppErrorKind::Upstream => 502,
            AppErrorKind::InternalError => 500,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code_u16())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}
