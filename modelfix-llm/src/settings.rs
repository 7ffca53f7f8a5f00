use serde::{Deserialize, Serialize};

/// GitHub Models inference endpoint.
pub const GITHUB_MODELS_URL: &str = "https://models.github.ai/inference/chat/completions";

/// Azure AI inference endpoint, an alternative for tokens issued there.
pub const AZURE_INFERENCE_URL: &str = "https://models.inference.ai.azure.com/chat/completions";

pub const DEFAULT_MODEL: &str = "openai/gpt-4o";
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const GITHUB_API_VERSION: &str = "2022-11-28";

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an expert software developer. Provide concise, actionable fixes.";

/// Everything needed to issue one chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    /// Sent as the system message; empty means none.
    pub system_prompt: Option<String>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            endpoint: GITHUB_MODELS_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: 0.2,
            top_p: 1.0,
            max_tokens: 4096,
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }
}

impl ModelSettings {
    /// System prompt to send, skipping blank ones.
    pub fn effective_system_prompt(&self) -> Option<&str> {
        self.system_prompt
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
