//! JSON bodies exchanged with the server endpoints.

use crate::{Character, Role, Usage};
use serde::{Deserialize, Serialize};

fn default_coaching() -> bool {
    true
}

/// One history entry as sent to `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<Character>,
    #[serde(default = "default_coaching")]
    pub coaching_enabled: bool,
}

/// Successful response body for `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Request body for `POST /api/tts`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<Character>,
}

/// Response body for the real-time voice token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// Response body of the external transcription endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    #[serde(default)]
    pub transcription: String,
}

/// Error body returned by every endpoint on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coaching_defaults_to_enabled() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hey"}]}"#).unwrap();
        assert!(req.coaching_enabled);
        assert!(req.character.is_none());
    }

    #[test]
    fn chat_request_uses_camel_case() {
        let req = ChatRequest {
            messages: vec![],
            character: None,
            coaching_enabled: false,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["coachingEnabled"], false);
        assert!(v.get("character").is_none());
    }

    #[test]
    fn access_token_field_name() {
        let v = serde_json::to_value(AccessTokenResponse {
            access_token: "tok".into(),
        })
        .unwrap();
        assert_eq!(v, serde_json::json!({"accessToken": "tok"}));
    }
}
