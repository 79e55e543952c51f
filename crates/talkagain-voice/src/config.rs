use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_tts_model() -> String {
    "tts-1".to_string()
}

fn default_speed() -> f32 {
    0.95
}

fn default_voice() -> String {
    "nova".to_string()
}

fn default_voices() -> BTreeMap<String, String> {
    [
        ("Maya", "nova"),
        ("Jordan", "onyx"),
        ("Alex", "shimmer"),
        ("Sam", "alloy"),
    ]
    .into_iter()
    .map(|(name, voice)| (name.to_string(), voice.to_string()))
    .collect()
}

fn default_hume_base_url() -> String {
    "https://api.hume.ai".to_string()
}

fn default_tts_timeout_seconds() -> u64 {
    60
}

fn default_token_timeout_seconds() -> u64 {
    15
}

/// Settings for the speech-synthesis provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    /// Shared with the LLM provider when left empty.
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_tts_model")]
    pub model: String,
    /// Playback speed multiplier; slightly below 1.0 for clarity.
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Voice used for characters missing from `voices`.
    #[serde(default = "default_voice")]
    pub default_voice: String,
    /// Character name to provider voice id.
    #[serde(default = "default_voices")]
    pub voices: BTreeMap<String, String>,
    #[serde(default = "default_tts_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            api_key: String::new(),
            model: default_tts_model(),
            speed: default_speed(),
            default_voice: default_voice(),
            voices: default_voices(),
            timeout_seconds: default_tts_timeout_seconds(),
        }
    }
}

impl fmt::Debug for TtsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("speed", &self.speed)
            .field("default_voice", &self.default_voice)
            .field("voices", &self.voices)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl TtsConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

/// Credentials for the real-time empathic-voice provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default = "default_hume_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default, skip_serializing)]
    pub secret_key: String,
    #[serde(default = "default_token_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            base_url: default_hume_base_url(),
            api_key: String::new(),
            secret_key: String::new(),
            timeout_seconds: default_token_timeout_seconds(),
        }
    }
}

impl fmt::Debug for RealtimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl RealtimeConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            timeout_seconds: default_token_timeout_seconds(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }
}
