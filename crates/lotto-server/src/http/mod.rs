mod routes;

pub use routes::create_router;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lotto_core::{Clock, DrawOrigin, DrawResolver, LottoError};
use serde::Serialize;
use std::sync::Arc;

/// Resolver type shared across HTTP handlers
pub type HttpResolver = DrawResolver<Arc<dyn DrawOrigin>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<HttpResolver>,
    /// Decides which rounds count as "latest".
    pub clock: Arc<dyn Clock>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(resolver: Arc<HttpResolver>, clock: Arc<dyn Clock>) -> Self {
        Self {
            resolver,
            clock,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Error body: `{"error": "..."}`
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error type for HTTP handlers
#[derive(Debug)]
pub enum AppError {
    /// Caller sent something unusable (400).
    BadRequest(String),
    /// The round exists in principle but the origin has nothing for it (404).
    NotReady,
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotReady => (StatusCode::NOT_FOUND, "not_ready".to_string()),
            AppError::Internal(e) => {
                tracing::error!("Request failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<LottoError> for AppError {
    fn from(err: LottoError) -> Self {
        if err.is_client_error() {
            Self::BadRequest(err.to_string())
        } else {
            Self::Internal(err.into())
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
