//! AI Caller — the single point of entry for all Gemini API calls in
//! SkillBridge. No other module may talk to the provider directly.
//!
//! Resilience model: an ordered model-priority list × an ordered credential
//! pool. The dispatcher walks models in priority order and, for each model,
//! every credential in order. A "not found" failure abandons the model (no
//! credential can save it); any other failure advances to the next credential.
//! First success wins and short-circuits both loops, so total attempts are
//! bounded by |models| × |credentials|.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Per-attempt timeout. A hung attempt is classified as transient, which
/// advances the credential rather than the model.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Fixed model failover order, best quota/speed balance first.
pub const MODEL_PRIORITY: [&str; 4] = [
    "models/gemini-1.5-flash",
    "models/gemini-flash-latest",
    "models/gemini-1.5-flash-8b",
    "models/gemini-2.0-flash-exp",
];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No API keys configured. Set GOOGLE_API_KEY (and optional GOOGLE_API_KEY_1..N).")]
    NoCredentials,

    #[error("All models and all keys were exhausted after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("Model returned empty content")]
    EmptyContent,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-attempt failure classification. Internal to the dispatcher; callers
/// only ever see `LlmError`.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// HTTP 404 or a "not found" message: the model does not exist for any
    /// credential, so the dispatcher skips it entirely.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Everything else — quota, rate limit, server error, network failure,
    /// timeout. The next credential may still work for the same model.
    #[error("transient failure: {0}")]
    Transient(String),
}

/// One part of a `generateContent` payload: plain text or an inline image.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Text(String),
    InlineData(InlineData),
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

impl Part {
    pub fn text(s: impl Into<String>) -> Self {
        Part::Text(s.into())
    }

    pub fn inline_image(mime_type: impl Into<String>, data_base64: String) -> Self {
        Part::InlineData(InlineData {
            mime_type: mime_type.into(),
            data: data_base64,
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: &'a [Part],
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate's parts.
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// One wire-level attempt against a specific (model, credential) pair.
/// A trait seam so the dispatcher's failover logic is testable without a
/// network.
#[async_trait]
pub trait ProviderTransport: Send + Sync {
    async fn attempt(
        &self,
        model: &str,
        api_key: &str,
        parts: &[Part],
    ) -> Result<String, AttemptError>;
}

/// Production transport: Gemini `generateContent` over HTTPS.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(ATTEMPT_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderTransport for HttpTransport {
    async fn attempt(
        &self,
        model: &str,
        api_key: &str,
        parts: &[Part],
    ) -> Result<String, AttemptError> {
        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");
        let body = GenerateRequest {
            contents: [Content { parts }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AttemptError::Transient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(classify_failure(status.as_u16(), &message));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AttemptError::Transient(e.to_string()))?;

        parsed
            .text()
            .ok_or_else(|| AttemptError::Transient("empty candidate content".to_string()))
    }
}

/// 404 (or an explicit "not found" message) means the model itself is
/// unreachable; everything else is worth retrying with another credential.
fn classify_failure(status: u16, message: &str) -> AttemptError {
    if status == 404 || message.to_lowercase().contains("not found") {
        AttemptError::ModelUnavailable(format!("{status}: {message}"))
    } else {
        AttemptError::Transient(format!("{status}: {message}"))
    }
}

/// The resilient multi-model, multi-key Gemini client. Read-only after
/// construction — safe to share across concurrent requests without locking.
#[derive(Clone)]
pub struct GeminiClient {
    transport: Arc<dyn ProviderTransport>,
    models: Vec<String>,
    api_keys: Vec<String>,
}

impl GeminiClient {
    pub fn new(api_keys: Vec<String>) -> Self {
        Self::with_transport(
            Arc::new(HttpTransport::new()),
            MODEL_PRIORITY.iter().map(|m| m.to_string()).collect(),
            api_keys,
        )
    }

    /// Constructor with explicit transport and model list, used by tests and
    /// by callers that need a custom priority order.
    pub fn with_transport(
        transport: Arc<dyn ProviderTransport>,
        models: Vec<String>,
        api_keys: Vec<String>,
    ) -> Self {
        Self {
            transport,
            models,
            api_keys,
        }
    }

    /// Runs the failover loop and returns the first successful response text.
    pub async fn generate(&self, parts: &[Part]) -> Result<String, LlmError> {
        if self.api_keys.is_empty() {
            return Err(LlmError::NoCredentials);
        }

        let mut attempts = 0u32;

        for model in &self.models {
            debug!("Attempting model '{model}'");

            for (key_index, key) in self.api_keys.iter().enumerate() {
                attempts += 1;
                match self.transport.attempt(model, key, parts).await {
                    Ok(text) => {
                        debug!("Connected to {model} using key #{}", key_index + 1);
                        return Ok(text);
                    }
                    Err(AttemptError::ModelUnavailable(msg)) => {
                        warn!("Model '{model}' is not available ({msg}); skipping it");
                        break; // no credential can reach this model
                    }
                    Err(AttemptError::Transient(msg)) => {
                        warn!("Key #{} failed for '{model}': {msg}", key_index + 1);
                        continue;
                    }
                }
            }
        }

        Err(LlmError::Exhausted { attempts })
    }

    /// Calls the model and deserializes the text response as JSON.
    /// The prompt must instruct the model to return a JSON object; markdown
    /// code fences around the payload are tolerated and stripped.
    pub async fn generate_json<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, LlmError> {
        let text = self.generate(&[Part::text(prompt)]).await?;
        let cleaned = strip_json_fences(&text);
        serde_json::from_str(cleaned).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
