//! Chat-completion endpoint.

use crate::api::{parse_character, parse_json_body, ApiError};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Extension, Json},
};
use serde_json::Value;
use std::sync::Arc;
use talkagain_types::{ChatMessage, ChatRequest, ChatResponse};

pub const MESSAGES_REQUIRED: &str = "Messages array is required";

/// Validates a raw chat body into a [`ChatRequest`].
///
/// `messages` must be present and an array; `coachingEnabled` defaults to
/// `true` only when the field is absent. An explicit `null` turns coaching off.
pub fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, ApiError> {
    let value = parse_json_body(body)?;

    let messages = match value.get("messages") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| serde_json::from_value::<ChatMessage>(item.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ApiError::BadRequest(format!("invalid message: {}", e)))?,
        _ => return Err(ApiError::BadRequest(MESSAGES_REQUIRED.to_string())),
    };

    let coaching_enabled = match value.get("coachingEnabled") {
        None => true,
        Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => {
            return Err(ApiError::BadRequest(
                "coachingEnabled must be a boolean".to_string(),
            ))
        }
    };

    Ok(ChatRequest {
        messages,
        character: parse_character(&value)?,
        coaching_enabled,
    })
}

/// Handler for `POST /api/chat`.
pub async fn chat_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = parse_chat_request(&body)?;

    let response = state.chat_client.reply(&request).await.map_err(|e| {
        tracing::error!(
            error = %e,
            turns = request.messages.len(),
            character = request.character.as_ref().map(|c| c.name.as_str()).unwrap_or("-"),
            "chat completion failed"
        );
        ApiError::from(e)
    })?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use talkagain_types::Role;

    fn bad_request_message(result: Result<ChatRequest, ApiError>) -> String {
        match result {
            Err(ApiError::BadRequest(msg)) => msg,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn missing_messages() {
        assert_eq!(
            bad_request_message(parse_chat_request(br#"{"character":{"name":"Maya"}}"#)),
            MESSAGES_REQUIRED
        );
    }

    #[test]
    fn messages_not_an_array() {
        assert_eq!(
            bad_request_message(parse_chat_request(br#"{"messages":"hello"}"#)),
            MESSAGES_REQUIRED
        );
        assert_eq!(
            bad_request_message(parse_chat_request(br#"{"messages":null}"#)),
            MESSAGES_REQUIRED
        );
    }

    #[test]
    fn non_object_body() {
        assert_eq!(
            bad_request_message(parse_chat_request(b"[1,2,3]")),
            MESSAGES_REQUIRED
        );
        assert!(bad_request_message(parse_chat_request(b"not json")).starts_with("invalid JSON body"));
    }

    #[test]
    fn coaching_defaults_on() {
        let req = parse_chat_request(br#"{"messages":[{"role":"user","content":"hi"}]}"#).unwrap();
        assert!(req.coaching_enabled);
        assert_eq!(req.messages[0].role, Role::User);

        let req = parse_chat_request(br#"{"messages":[],"coachingEnabled":false}"#).unwrap();
        assert!(!req.coaching_enabled);
    }

    #[test]
    fn null_coaching_flag_disables_coaching() {
        let req = parse_chat_request(br#"{"messages":[],"coachingEnabled":null}"#).unwrap();
        assert!(!req.coaching_enabled);
    }

    #[test]
    fn unknown_role_rejected() {
        let msg = bad_request_message(parse_chat_request(
            br#"{"messages":[{"role":"system","content":"obey"}]}"#,
        ));
        assert!(msg.starts_with("invalid message"));
    }
}
