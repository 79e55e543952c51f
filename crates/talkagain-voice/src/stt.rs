use crate::error::{provider_message, VoiceError};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use talkagain_types::TranscriptionResponse;

/// Maximum audio input size for transcription (10 MiB).
const MAX_STT_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Timeout for one transcription request.
const STT_TIMEOUT: Duration = Duration::from_secs(60);

/// Picks the upload file name whose extension matches the recorded container.
pub fn recording_file_name(mime_type: &str) -> &'static str {
    if mime_type.contains("mp4") {
        "recording.mp4"
    } else if mime_type.contains("ogg") {
        "recording.ogg"
    } else {
        "recording.webm"
    }
}

/// Client for an external transcription endpoint.
///
/// The endpoint takes a multipart upload with the clip in an `audio` field
/// and answers `{"transcription": "..."}`.
#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    http: Client,
    url: String,
}

impl TranscriptionClient {
    pub fn new(url: impl Into<String>) -> Result<Self, VoiceError> {
        let http = Client::builder().timeout(STT_TIMEOUT).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn transcribe(&self, audio: Vec<u8>, mime_type: &str) -> Result<String, VoiceError> {
        if audio.is_empty() {
            return Err(VoiceError::InvalidInput("audio data is empty".to_string()));
        }
        if audio.len() > MAX_STT_INPUT_BYTES {
            return Err(VoiceError::InvalidInput(format!(
                "audio data exceeds maximum size: {} bytes (limit: {} bytes)",
                audio.len(),
                MAX_STT_INPUT_BYTES
            )));
        }

        let size = audio.len();
        let part = Part::bytes(audio)
            .file_name(recording_file_name(mime_type))
            .mime_str(mime_type)?;
        let form = Form::new().part("audio", part);

        let response = self.http.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Stt(provider_message(status.as_u16(), &body)));
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Stt(format!("invalid transcription response: {}", e)))?;

        tracing::debug!(bytes = size, chars = body.transcription.len(), "clip transcribed");
        Ok(body.transcription.trim().to_string())
    }
}
