use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;
use crate::session::{clock::Clock, repository::SessionRepository};
use crate::tradovate::{TradovateApi, UpstreamError};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub session_repository: Arc<dyn SessionRepository + Send + Sync>,
    pub tradovate: Arc<dyn TradovateApi + Send + Sync>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        session_repository: Arc<dyn SessionRepository + Send + Sync>,
        tradovate: Arc<dyn TradovateApi + Send + Sync>,
        clock: Arc<dyn Clock>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            session_repository,
            tradovate,
            clock,
            config,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        details: Option<String>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream error ({status}): {message}")]
    Upstream {
        status: StatusCode,
        message: String,
        details: Option<String>,
    },

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    /// Maps an upstream failure, keeping its status when it is a real error code
    pub fn from_upstream(error: UpstreamError, message: impl Into<String>) -> Self {
        match error {
            UpstreamError::Status { status, body } => AppError::Upstream {
                status: StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                message: message.into(),
                details: Some(body).filter(|b| !b.is_empty()),
            },
            UpstreamError::Transport(_) => {
                AppError::UpstreamUnavailable("Could not connect to Tradovate".to_string())
            }
            UpstreamError::Decode(_) => {
                AppError::UpstreamUnavailable("Invalid response from Tradovate".to_string())
            }
        }
    }
}

/// Malformed or mistyped request bodies become a JSON 400 like every other error
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: "Invalid request body".to_string(),
            details: Some(rejection.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::BadRequest { message, details } => (StatusCode::BAD_REQUEST, message, details),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Upstream {
                status,
                message,
                details,
            } => (status, message, details),
            AppError::UpstreamUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg, None),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
            ),
        };

        let body = match details {
            Some(details) => json!({ "error": error_message, "details": details }),
            None => json!({ "error": error_message }),
        };

        (status, Json(body)).into_response()
    }
}
