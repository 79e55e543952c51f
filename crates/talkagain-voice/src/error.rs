use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Caller-supplied input that can never succeed (maps to a client error).
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Tts(String),

    #[error("{0}")]
    Stt(String),

    #[error("{0}")]
    Token(String),
}

/// Extracts the most useful message from a provider's error body.
pub(crate) fn provider_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str().map(str::to_string))
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("provider returned status {}", status)
            } else {
                body.trim().to_string()
            }
        })
}
