//! Client for the remote parse endpoint: free text in, [`ParsedIntent`] out.
//!
//! The endpoint answers `{"result": "<json text>"}`; the text may be wrapped
//! in a Markdown code fence. Transport failures, non-2xx answers and bodies
//! without a result are service failures; a result that is not a JSON object
//! is a malformed intent.

use serde_json::Value;
use thiserror::Error;

use crate::config::ClientTimeouts;
use crate::http;
use crate::intent::{self, IntentError, ParsedIntent};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("query is empty")]
    EmptyQuery,
    #[error("parse endpoint unreachable: {0}")]
    Unreachable(#[from] curl::Error),
    #[error("parse endpoint returned HTTP {0}")]
    Status(u32),
    #[error("parse endpoint response has no result")]
    MissingResult,
    #[error("could not decode filters: {0}")]
    MalformedIntent(#[from] IntentError),
}

/// Anything that can turn user text into a parsed intent.
pub trait IntentSource {
    fn parse_intent(&self, query: &str) -> Result<ParsedIntent, ParseError>;
}

/// Blocking HTTP client for the parse endpoint.
#[derive(Debug, Clone)]
pub struct ParseClient {
    endpoint: String,
    timeouts: ClientTimeouts,
}

impl ParseClient {
    pub fn new(endpoint: impl Into<String>, timeouts: ClientTimeouts) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeouts,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `{"query": query}` and decodes the intent from the answer.
    pub fn parse(&self, query: &str) -> Result<ParsedIntent, ParseError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ParseError::EmptyQuery);
        }
        let body = serde_json::json!({ "query": query }).to_string();
        let response = http::post_json(&self.endpoint, body.as_bytes(), &[], self.timeouts)?;
        if !response.is_success() {
            tracing::warn!(status = response.status, "parse endpoint failed");
            return Err(ParseError::Status(response.status));
        }
        intent_from_response(&response.body)
    }
}

impl IntentSource for ParseClient {
    fn parse_intent(&self, query: &str) -> Result<ParsedIntent, ParseError> {
        self.parse(query)
    }
}

/// Extracts the intent from a parse endpoint response body.
pub fn intent_from_response(body: &[u8]) -> Result<ParsedIntent, ParseError> {
    let envelope: Value = serde_json::from_slice(body).map_err(|_| ParseError::MissingResult)?;
    match envelope.get("result") {
        Some(Value::String(text)) if !text.trim().is_empty() => {
            let parsed = intent::decode(text);
            if parsed.is_err() {
                tracing::error!(result = %text, "could not parse result as JSON");
            }
            Ok(parsed?)
        }
        Some(obj @ Value::Object(_)) => Ok(ParsedIntent::from_value(obj)),
        _ => Err(ParseError::MissingResult),
    }
}
