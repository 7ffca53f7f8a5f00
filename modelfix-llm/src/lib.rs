//! Chat-completion client for OpenAI-compatible endpoints.
//!
//! One request per call, a fixed timeout and no retry. The bearer token is
//! read from a single configurable environment variable.

mod client;
mod error;
mod settings;

pub use client::{
    ChatClient, ChatMessage, ChatRequest, build_request, http_error_message, parse_completion,
    sanitize_api_response, truncate_str,
};
pub use error::LlmError;
pub use settings::{
    AZURE_INFERENCE_URL, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TOKEN_ENV, GITHUB_API_VERSION, GITHUB_MODELS_URL, ModelSettings,
};
