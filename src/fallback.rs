//! Free-text fallback for questions no intent matches.
//!
//! The engine only depends on [`FallbackResponder`]; failures are turned
//! into an `Error: ...` answer there, so implementations just return
//! `Err`.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::config::{FallbackSettings, TOKEN_ENV};
use crate::error::FallbackError;

/// Reply used when no remote responder is wired in.
pub const OFFLINE_REPLY: &str = "Sorry, I didn't understand the question.";

/// Longest response body quoted back in an error.
const ERROR_BODY_LIMIT: usize = 200;

/// External collaborator answering unclassified questions.
pub trait FallbackResponder: Send + Sync {
    /// Answer `question`. Any transport or parse failure is an `Err`.
    fn respond(&self, question: &str) -> Result<String, FallbackError>;

    /// Responder name for logging.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Offline responder
// ---------------------------------------------------------------------------

/// Answers every question with [`OFFLINE_REPLY`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineResponder;

impl FallbackResponder for OfflineResponder {
    fn respond(&self, _question: &str) -> Result<String, FallbackError> {
        Ok(OFFLINE_REPLY.to_string())
    }

    fn name(&self) -> &str {
        "offline"
    }
}

// ---------------------------------------------------------------------------
// Hosted inference responder
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Text-generation model behind a hosted inference endpoint
/// (`POST <api_base>/<model>` with `{"inputs": question}`).
pub struct HuggingFaceResponder {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HuggingFaceResponder {
    /// Build a client whose every request is bounded by the configured timeout.
    pub fn new(settings: &FallbackSettings) -> Result<Self, FallbackError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self::with_client(
            client,
            settings.endpoint(),
            settings.api_token.clone(),
        ))
    }

    /// Use an already configured client.
    pub fn with_client(client: Client, endpoint: impl Into<String>, token: Option<String>) -> Self {
        HuggingFaceResponder {
            client,
            endpoint: endpoint.into(),
            token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl FallbackResponder for HuggingFaceResponder {
    fn respond(&self, question: &str) -> Result<String, FallbackError> {
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(FallbackError::MissingCredential(TOKEN_ENV))?;

        log::debug!("asking {} ({} chars)", self.endpoint, question.len());
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&InferenceRequest { inputs: question })
            .send()?;

        let status = response.status();
        let body = response.text()?;
        let parsed = serde_json::from_str::<JsonValue>(&body);

        if !status.is_success() {
            if let Some(message) = parsed.as_ref().ok().and_then(service_error) {
                return Err(FallbackError::Service(message));
            }
            return Err(FallbackError::Status {
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        let value = parsed.map_err(|e| FallbackError::InvalidResponse(e.to_string()))?;
        extract_reply(value)
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}

/// Pull the generated text out of an inference response.
///
/// * `[{"generated_text": "..."}, ...]` → first candidate
/// * `{"generated_text": "..."}` → that text
/// * `{"error": "..."}` → [`FallbackError::Service`]
/// * any other JSON → its compact text
pub fn extract_reply(value: JsonValue) -> Result<String, FallbackError> {
    if let Some(text) = value
        .as_array()
        .and_then(|candidates| candidates.first())
        .and_then(generated_text)
    {
        return Ok(text);
    }
    if let Some(text) = generated_text(&value) {
        return Ok(text);
    }
    if let Some(message) = service_error(&value) {
        return Err(FallbackError::Service(message));
    }
    Ok(value.to_string())
}

fn generated_text(value: &JsonValue) -> Option<String> {
    match value.get("generated_text")? {
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn service_error(value: &JsonValue) -> Option<String> {
    match value.get("error")? {
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
