use thiserror::Error;

/// Failure of a single completion call.
///
/// Every variant renders as one line suitable for `Error: <message>` output.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{env} environment variable not set")]
    MissingToken { env: String },

    #[error("empty prompt")]
    EmptyPrompt,

    #[error("HTTP client: {0}")]
    Client(String),

    /// Non-2xx status. `message` is the API's `error.message` when present.
    #[error("HTTP {status} - {message}")]
    Http { status: u16, message: String },

    #[error("network error - {0}")]
    Network(String),

    #[error("invalid JSON response - {0}")]
    InvalidJson(String),

    #[error("unexpected API response format: {0}")]
    UnexpectedFormat(String),
}

impl LlmError {
    /// Recommended process exit code.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
