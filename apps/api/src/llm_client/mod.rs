/// LLM Client: the single point of entry for all generative-language calls.
///
/// ARCHITECTURAL RULE: No other module may talk to the Gemini endpoint directly.
/// Prompt construction and fallback policy live in `advisor`; this module only moves
/// text over the wire and pulls JSON arrays out of free-text replies.
///
/// One request per call: no retries, no streaming.
use regex::Regex;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

pub mod prompts;

pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Generation API key is not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("No JSON array found in model output")]
    NoJsonArray,
}

/// Sampling parameters sent with each request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// `candidates[0].content.parts[0].text`, if present.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single LLM client shared by every orchestrator.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends one prompt and returns the first candidate's text.
    pub async fn call(&self, prompt: &str, config: GenerationConfig) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: config,
        };

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerateResponse = response.json().await?;
        let text = generated
            .text()
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)?;

        debug!(
            "Generation call succeeded: prompt_chars={}, reply_chars={}",
            prompt.len(),
            text.len()
        );

        Ok(text.to_string())
    }

    /// Calls the model and deserializes the JSON array embedded in its reply.
    pub async fn call_json_array<T: DeserializeOwned>(
        &self,
        prompt: &str,
        config: GenerationConfig,
    ) -> Result<Vec<T>, LlmError> {
        let text = self.call(prompt, config).await?;
        parse_json_array(&text)
    }
}

fn greedy_array_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("array pattern is valid"))
}

/// Finds the JSON array inside free-text model output.
///
/// The span from the first `[` to the last `]` wins when it parses; otherwise the
/// earliest `[` at which a complete array parses is used.
pub fn extract_json_array(text: &str) -> Option<&str> {
    if let Some(m) = greedy_array_pattern().find(text) {
        if serde_json::from_str::<serde_json::Value>(m.as_str())
            .map(|v| v.is_array())
            .unwrap_or(false)
        {
            return Some(m.as_str());
        }
    }

    text.match_indices('[').find_map(|(start, _)| {
        let rest = &text[start..];
        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<serde_json::Value>();
        match stream.next() {
            Some(Ok(serde_json::Value::Array(_))) => Some(&rest[..stream.byte_offset()]),
            _ => None,
        }
    })
}

pub fn parse_json_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, LlmError> {
    let array = extract_json_array(text).ok_or(LlmError::NoJsonArray)?;
    Ok(serde_json::from_str(array)?)
}
