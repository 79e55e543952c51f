//! Speech-synthesis endpoint.

use crate::api::{parse_character, parse_json_body, ApiError};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::Extension,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

pub const TEXT_REQUIRED: &str = "Text is required";

/// Handler for `POST /api/tts`.
///
/// Returns the synthesized MP3 with explicit content type and length.
pub async fn tts_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let value = parse_json_body(&body)?;

    let text = value
        .get("text")
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest(TEXT_REQUIRED.to_string()))?;
    let character = parse_character(&value)?;

    let audio = state
        .tts_service
        .synthesize(text, character.as_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "speech synthesis failed");
            ApiError::from(e)
        })?;

    let length = audio.bytes.len().to_string();
    Ok((
        [
            (header::CONTENT_TYPE, audio.content_type.to_string()),
            (header::CONTENT_LENGTH, length),
        ],
        audio.bytes,
    )
        .into_response())
}
