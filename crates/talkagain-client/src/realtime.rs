//! Real-time voice mode.
//!
//! Session lifecycle, audio streaming, and barge-in belong to the provider's
//! SDK. This side only obtains the token before the first connect and turns
//! the SDK's message stream into transcript lines.

use crate::error::ClientError;
use crate::ports::TokenSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use talkagain_types::{Character, Role};

/// Everything the SDK needs to open a session.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeConnectParams {
    pub access_token: String,
    pub config_id: String,
}

impl std::fmt::Debug for RealtimeConnectParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeConnectParams")
            .field("access_token", &"[REDACTED]")
            .field("config_id", &self.config_id)
            .finish()
    }
}

/// Connection state reported by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RealtimeStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl RealtimeStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connected => "Live",
            Self::Connecting => "Connecting...",
            Self::Disconnected => "Ready",
            Self::Error => "Connection error",
        }
    }
}

pub struct RealtimeLauncher {
    tokens: Arc<dyn TokenSource>,
}

impl RealtimeLauncher {
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self { tokens }
    }

    /// Fetches a fresh token and pairs it with the character's configuration.
    ///
    /// The configuration id is checked first so that a character without one
    /// never costs a token.
    pub async fn prepare(&self, character: &Character) -> Result<RealtimeConnectParams, ClientError> {
        let config_id = character
            .realtime_config_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ClientError::Realtime(format!(
                    "no voice configuration for {}",
                    character.name
                ))
            })?
            .to_string();

        let access_token = self.tokens.access_token().await?;
        if access_token.is_empty() {
            return Err(ClientError::Realtime(
                "Failed to get access token".to_string(),
            ));
        }

        tracing::debug!(character = %character.name, %config_id, "real-time session prepared");
        Ok(RealtimeConnectParams {
            access_token,
            config_id,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SdkContent {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SdkMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    message: Option<SdkContent>,
}

/// One rendered line of the live transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptLine {
    pub role: Role,
    pub text: String,
}

impl TranscriptLine {
    /// User lines sit on the right, everything else on the left.
    pub fn is_right_aligned(&self) -> bool {
        self.role == Role::User
    }
}

/// Accumulates the SDK's message stream into transcript lines.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RealtimeTranscript {
    lines: Vec<TranscriptLine>,
}

pub const LISTENING_PLACEHOLDER: &str = "Listening...";

impl RealtimeTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one SDK message. Returns the rendered line, or `None` for message
    /// kinds that are not part of the transcript.
    pub fn push(&mut self, raw: &serde_json::Value) -> Option<&TranscriptLine> {
        let msg: SdkMessage = serde_json::from_value(raw.clone()).ok()?;
        let role = match msg.kind.as_str() {
            "user_message" => Role::User,
            "assistant_message" => Role::Assistant,
            _ => return None,
        };
        let text = msg
            .message
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| LISTENING_PLACEHOLDER.to_string());
        self.lines.push(TranscriptLine { role, text });
        self.lines.last()
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_user_and_assistant_lines() {
        let mut t = RealtimeTranscript::new();
        t.push(&json!({"type": "user_message", "message": {"role": "user", "content": "Hi Maya"}}));
        t.push(&json!({"type": "assistant_message", "message": {"role": "assistant", "content": "hey"}}));
        assert_eq!(t.lines().len(), 2);
        assert!(t.lines()[0].is_right_aligned());
        assert_eq!(t.lines()[1].text, "hey");
        assert!(!t.lines()[1].is_right_aligned());
    }

    #[test]
    fn missing_content_shows_listening() {
        let mut t = RealtimeTranscript::new();
        let line = t.push(&json!({"type": "user_message"})).unwrap();
        assert_eq!(line.text, LISTENING_PLACEHOLDER);
        let line = t
            .push(&json!({"type": "assistant_message", "message": {"content": ""}}))
            .unwrap();
        assert_eq!(line.text, LISTENING_PLACEHOLDER);
    }

    #[test]
    fn other_message_kinds_are_skipped() {
        let mut t = RealtimeTranscript::new();
        assert!(t.push(&json!({"type": "audio_output", "data": "AAAA"})).is_none());
        assert!(t.push(&json!({"type": "assistant_end"})).is_none());
        assert!(t.push(&json!("not an object")).is_none());
        assert!(t.is_empty());
    }

    #[test]
    fn status_labels() {
        assert_eq!(RealtimeStatus::Connected.label(), "Live");
        assert_eq!(RealtimeStatus::default().label(), "Ready");
    }

    #[test]
    fn connect_params_debug_hides_token() {
        let params = RealtimeConnectParams {
            access_token: "secret-token".into(),
            config_id: "cfg".into(),
        };
        let dbg = format!("{:?}", params);
        assert!(!dbg.contains("secret-token"));
        assert!(dbg.contains("cfg"));
    }
}
