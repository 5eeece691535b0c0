//! Web error types and notice formatting.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::error::Error;

/// Result type for web handlers.
pub type WebResult<T> = Result<T, WebError>;

/// Failures that prevent a page from being rendered at all.
#[derive(Error, Debug)]
pub enum WebError {
    /// Template could not be compiled or rendered (500)
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Server misconfiguration (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl WebError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::Template(_) | WebError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        let body = format!(
            "<!doctype html><title>Error</title><h1>{}</h1><p>{}</p>",
            self.status_code(),
            html_escape(&self.to_string())
        );
        (self.status_code(), Html(body)).into_response()
    }
}

/// HTTP status for an operation failure shown as a notice.
pub fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InstanceTypeNotAllowed { .. } | Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::QuotaExceeded { .. } => StatusCode::CONFLICT,
        Error::NotManaged { .. } | Error::OwnershipMismatch { .. } => StatusCode::FORBIDDEN,
        Error::ImageNotFound(_)
        | Error::InstanceNotFound(_)
        | Error::ZoneNotFound(_)
        | Error::FileNotFound(_) => StatusCode::NOT_FOUND,
        Error::Provider { .. } => StatusCode::BAD_GATEWAY,
    }
}

/// Outcome banner shown above a re-rendered section.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    /// `success`, `warning` or `error`
    pub level: &'static str,
    pub message: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: "success",
            message: message.into(),
            status: StatusCode::OK,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: "warning",
            message: message.into(),
            status: StatusCode::OK,
        }
    }

    pub fn error(err: &Error) -> Self {
        Self {
            level: "error",
            message: format!("Error: {}", err),
            status: status_for(err),
        }
    }

    /// Success notice with the returned message, or an error notice.
    pub fn from_result(result: crate::error::Result<String>) -> Self {
        match result {
            Ok(message) => Self::success(message),
            Err(err) => {
                tracing::warn!(error = %err, "Action refused or failed");
                Self::error(&err)
            }
        }
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
