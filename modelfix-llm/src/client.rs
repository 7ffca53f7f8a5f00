use crate::error::LlmError;
use crate::settings::{GITHUB_API_VERSION, ModelSettings};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Longest slice of a response body quoted in an error message.
const MAX_ERROR_CONTENT_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub fn build_request(settings: &ModelSettings, prompt: &str) -> ChatRequest {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = settings.effective_system_prompt() {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system.to_string(),
        });
    }
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: prompt.to_string(),
    });

    ChatRequest {
        model: settings.model.trim().to_string(),
        messages,
        temperature: settings.temperature,
        top_p: settings.top_p,
        max_tokens: settings.max_tokens,
    }
}

/// Content of the first choice of a successful response body.
pub fn parse_completion(body: &str) -> Result<String, LlmError> {
    let chat: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::InvalidJson(e.to_string()))?;
    chat.choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::UnexpectedFormat(sanitize_api_response(body)))
}

/// Human-readable message for a non-2xx response body.
///
/// Prefers the API's `error.message`; otherwise quotes the sanitized body.
pub fn http_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|env| env.error)
        .and_then(|err| err.message)
        .unwrap_or_else(|| sanitize_api_response(body))
}

/// Truncate response content for error messages and redact anything that
/// looks like a credential.
pub fn sanitize_api_response(content: &str) -> String {
    const SECRET_PATTERNS: &[&str] = &[
        "api_key",
        "apikey",
        "secret",
        "password",
        "credential",
        "bearer",
        "ghp_",
        "github_pat_",
        "sk-",
    ];

    let truncated = truncate_str(content.trim(), MAX_ERROR_CONTENT_LEN);
    let lower = truncated.to_lowercase();
    if SECRET_PATTERNS.iter().any(|p| lower.contains(p)) {
        return "(response details redacted - may contain sensitive data)".to_string();
    }
    truncated.to_string()
}

pub fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// One-request chat client. No retries.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    settings: ModelSettings,
    token: String,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("settings", &self.settings)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ChatClient {
    pub fn new(settings: ModelSettings, token: impl Into<String>) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;
        Ok(Self {
            http,
            settings,
            token: token.into(),
        })
    }

    /// Read the bearer token from the environment variable named in `settings`.
    pub fn from_env(settings: ModelSettings) -> Result<Self, LlmError> {
        let token = std::env::var(&settings.token_env)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LlmError::MissingToken {
                env: settings.token_env.clone(),
            })?;
        Self::new(settings, token)
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if prompt.trim().is_empty() {
            return Err(LlmError::EmptyPrompt);
        }

        let body = build_request(&self.settings, prompt);
        let started = Instant::now();
        debug!(
            endpoint = %self.settings.endpoint,
            model = %body.model,
            prompt_chars = prompt.chars().count(),
            "sending completion request"
        );

        let resp = self
            .http
            .post(&self.settings.endpoint)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "completion request failed");
            return Err(LlmError::Http {
                status: status.as_u16(),
                message: http_error_message(&text),
            });
        }

        let content = parse_completion(&text)?;
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            reply_chars = content.chars().count(),
            "completion received"
        );
        Ok(content)
    }
}
