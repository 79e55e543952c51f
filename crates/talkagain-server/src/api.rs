//! Shared API error type and catalog handler.

use crate::AppState;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use talkagain_llm::LlmError;
use talkagain_types::{Character, ErrorResponse};
use talkagain_voice::VoiceError;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
///
/// The display text is what the browser sees in the `error` field, so
/// upstream variants carry the provider's message unchanged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<LlmError> for ApiError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Config(_) => ApiError::InternalServerError(e.to_string()),
            _ => ApiError::Upstream(e.to_string()),
        }
    }
}

impl From<VoiceError> for ApiError {
    fn from(e: VoiceError) -> Self {
        match e {
            VoiceError::InvalidInput(msg) => ApiError::BadRequest(msg),
            VoiceError::Config(_) => ApiError::InternalServerError(e.to_string()),
            _ => ApiError::Upstream(e.to_string()),
        }
    }
}

/// Parses a raw request body as JSON, mapping syntax errors to 400.
pub(crate) fn parse_json_body(body: &[u8]) -> Result<serde_json::Value, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))
}

/// Reads the optional `character` field of a request object.
pub(crate) fn parse_character(
    value: &serde_json::Value,
) -> Result<Option<Character>, ApiError> {
    match value.get("character") {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(raw) => serde_json::from_value(raw.clone())
            .map(Some)
            .map_err(|e| ApiError::BadRequest(format!("invalid character: {}", e))),
    }
}

/// Handler for `GET /api/characters`.
pub async fn list_characters_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<Vec<Character>> {
    Json(state.characters.as_ref().clone())
}
