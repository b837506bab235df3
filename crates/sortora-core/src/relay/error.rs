//! Relay error types and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure talking to the upstream model.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("environment variable {0} with the upstream API key is not set")]
    MissingApiKey(String),
    #[error("upstream request failed: {0}")]
    Transport(#[from] curl::Error),
    #[error("upstream returned HTTP {0}")]
    Status(u32),
    #[error("malformed upstream response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("upstream response has no choices")]
    EmptyChoices,
    #[error("completion worker failed: {0}")]
    Worker(String),
}

/// Error answer from the relay endpoint.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("Missing query")]
    MissingQuery,
    #[error("Upstream request failed")]
    Upstream(#[from] RelayError),
}

impl IntoResponse for ReplyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReplyError::MissingQuery => {
                tracing::warn!("no query provided");
                StatusCode::BAD_REQUEST
            }
            ReplyError::Upstream(e) => {
                tracing::error!(error = %e, "upstream completion failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
