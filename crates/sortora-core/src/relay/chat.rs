//! Upstream chat-completions client (OpenAI-compatible wire format).

use serde::{Deserialize, Serialize};

use super::error::RelayError;
use crate::config::{ClientTimeouts, RelayConfig};
use crate::http;

/// Instructions that pin the model to the parsed-intent schema.
pub const SYSTEM_PROMPT: &str = r#"You extract structured shopping filters from a user's free-text marketplace query.

Reply with a single JSON object and nothing else. Use only these keys, and omit any key the user did not mention or clearly imply:
{
  "query": string,            // the item being searched for, without price/sort/location words
  "brand": string,
  "category": string,         // use "vehicles" for cars, trucks, SUVs, vans, motorcycles
  "carType": string,          // e.g. "sedan", "suv", "truck"
  "yearMin": number,
  "mileageMax": number,
  "color": string,
  "interiorColor": string,
  "priceRange": {"min": number, "max": number} | string,
  "delivery": "local pickup" | "shipping",
  "sort": "price low to high" | "price high to low" | "newest" | "lowest mileage",
  "radius": number,           // kilometres
  "datePosted": string        // e.g. "last 7 days"
}

Example:
User: used Toyota RAV4 SUV, 2016 or newer, under $15000, less than 100000 km, newest first
{"query": "Toyota RAV4", "brand": "Toyota", "category": "vehicles", "carType": "suv", "yearMin": 2016, "mileageMax": 100000, "priceRange": {"max": 15000}, "sort": "newest"}
"#;

/// Turns a user query into the model's raw text answer.
pub trait Completion: Send + Sync {
    fn complete(&self, query: &str) -> Result<String, RelayError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Blocking chat-completions client authenticated with a bearer key.
#[derive(Clone)]
pub struct ChatClient {
    api_url: String,
    model: String,
    temperature: f64,
    api_key: String,
    timeouts: ClientTimeouts,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ChatClient {
    pub fn new(cfg: &RelayConfig, api_key: impl Into<String>) -> Self {
        Self {
            api_url: cfg.api_url.clone(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            api_key: api_key.into(),
            timeouts: cfg.timeouts,
        }
    }

    /// Builds a client with the key read from the environment variable named
    /// by `cfg.api_key_env`.
    pub fn from_env(cfg: &RelayConfig) -> Result<Self, RelayError> {
        match std::env::var(&cfg.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(cfg, key.trim())),
            _ => Err(RelayError::MissingApiKey(cfg.api_key_env.clone())),
        }
    }

    pub fn request_body<'a>(&'a self, query: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: query.to_string(),
                },
            ],
            temperature: self.temperature,
        }
    }
}

impl Completion for ChatClient {
    fn complete(&self, query: &str) -> Result<String, RelayError> {
        let body = serde_json::to_vec(&self.request_body(query))?;
        let auth = format!("Bearer {}", self.api_key);
        let response = http::post_json(
            &self.api_url,
            &body,
            &[("Authorization", auth.as_str())],
            self.timeouts,
        )?;
        if !response.is_success() {
            tracing::warn!(
                status = response.status,
                body = %String::from_utf8_lossy(&response.body),
                "upstream error"
            );
            return Err(RelayError::Status(response.status));
        }
        content_from_response(&response.body)
    }
}

/// Extracts `choices[0].message.content` from a chat-completions body.
pub fn content_from_response(body: &[u8]) -> Result<String, RelayError> {
    let parsed: ChatResponse = serde_json::from_slice(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or(RelayError::EmptyChoices)
}
