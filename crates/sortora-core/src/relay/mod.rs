//! Relay service: forwards a shopping query to the language model and hands
//! back its JSON answer with any code fence removed.
//!
//! `POST /` takes `{"query": "..."}` and answers `{"result": "<json text>"}`.
//! A missing query is a 400; any upstream failure is a 500. The upstream call
//! is blocking (curl) and runs on tokio's blocking pool.

mod chat;
mod error;

pub use chat::{
    content_from_response, ChatChoice, ChatClient, ChatMessage, ChatRequest, ChatResponse,
    Completion, SYSTEM_PROMPT,
};
pub use error::{RelayError, ReplyError};

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::intent::strip_code_fence;

/// Shared handler state.
#[derive(Clone)]
pub struct RelayState {
    completion: Arc<dyn Completion>,
}

impl RelayState {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self { completion }
    }
}

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/", post(parse_query))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `listen` and serves until the process exits.
pub async fn serve(listen: &str, completion: Arc<dyn Completion>) -> Result<()> {
    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("bind relay listener on {listen}"))?;
    serve_on(listener, completion).await
}

/// Serves on an already-bound listener.
pub async fn serve_on(listener: TcpListener, completion: Arc<dyn Completion>) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("relay listening on {addr}");
    axum::serve(listener, router(RelayState::new(completion)))
        .await
        .context("relay server failed")?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn parse_query(
    State(state): State<RelayState>,
    body: Bytes,
) -> Result<Json<Value>, ReplyError> {
    tracing::debug!(bytes = body.len(), "relay hit");
    let query = query_from_body(&body).ok_or(ReplyError::MissingQuery)?;
    tracing::info!(query = %query, "received query");

    let completion = Arc::clone(&state.completion);
    let raw = tokio::task::spawn_blocking(move || completion.complete(&query))
        .await
        .map_err(|e| RelayError::Worker(e.to_string()))??;
    tracing::debug!(raw = %raw, "raw model response");

    let cleaned = strip_code_fence(&raw);
    tracing::debug!(cleaned = %cleaned, "cleaned model response");
    Ok(Json(json!({ "result": cleaned })))
}

/// Non-blank `query` string from a JSON request body.
fn query_from_body(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let query = value.get("query")?.as_str()?;
    (!query.trim().is_empty()).then(|| query.to_string())
}
