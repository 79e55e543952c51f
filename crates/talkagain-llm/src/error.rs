use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// Non-success answer from the provider; `message` is the provider's own
    /// error text.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("invalid provider response: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl LlmError {
    /// Builds an [`LlmError::Api`] from a failed response body, preferring the
    /// provider's `error.message` field when the body is a JSON error object.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message").or(Some(e)))
                    .and_then(|m| m.as_str().map(str::to_string))
            })
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("provider returned status {}", status)
                } else {
                    body.trim().to_string()
                }
            });
        Self::Api { status, message }
    }
}
