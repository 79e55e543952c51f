use crate::config::TtsConfig;
use crate::error::{provider_message, VoiceError};
use crate::text::clean_for_speech;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use talkagain_types::Character;

/// Maximum cleaned input accepted by the synthesis provider, in characters.
const MAX_TTS_INPUT_CHARS: usize = 4096;

/// MIME type of the synthesized audio.
pub const SPEECH_CONTENT_TYPE: &str = "audio/mpeg";

/// Synthesized speech ready to be returned to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

#[derive(Serialize)]
struct SpeechPayload<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    speed: f32,
    response_format: &'a str,
}

/// Service for generating a character's spoken reply.
#[derive(Debug, Clone)]
pub struct TtsService {
    http: Client,
    config: TtsConfig,
}

impl TtsService {
    pub fn new(config: TtsConfig) -> Result<Self, VoiceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { http, config })
    }

    /// Looks up the provider voice for a character, by name.
    ///
    /// Unknown or absent characters get the configured default voice.
    pub fn voice_for(&self, character: Option<&Character>) -> &str {
        character
            .and_then(|c| self.config.voices.get(&c.name))
            .map(String::as_str)
            .unwrap_or(&self.config.default_voice)
    }

    /// Cleans `text` and synthesizes it in the character's voice.
    pub async fn synthesize(
        &self,
        text: &str,
        character: Option<&Character>,
    ) -> Result<SpeechAudio, VoiceError> {
        let input = clean_for_speech(text);
        if input.is_empty() {
            return Err(VoiceError::InvalidInput(
                "Text has no speakable content".to_string(),
            ));
        }
        let chars = input.chars().count();
        if chars > MAX_TTS_INPUT_CHARS {
            return Err(VoiceError::InvalidInput(format!(
                "text exceeds maximum size: {} characters (limit: {} characters)",
                chars, MAX_TTS_INPUT_CHARS
            )));
        }
        if self.config.api_key.trim().is_empty() {
            return Err(VoiceError::Config(
                "speech synthesis API key is not configured (set OPENAI_API_KEY)".to_string(),
            ));
        }
        if self.config.speed < 0.25 || self.config.speed > 4.0 {
            return Err(VoiceError::Config(
                "Speed must be between 0.25 and 4.0".to_string(),
            ));
        }

        let voice = self.voice_for(character);
        let payload = SpeechPayload {
            model: &self.config.model,
            voice,
            input: &input,
            speed: self.config.speed,
            response_format: "mp3",
        };

        let url = format!("{}/audio/speech", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Tts(provider_message(status.as_u16(), &body)));
        }

        let bytes = response.bytes().await?.to_vec();
        tracing::debug!(voice, chars, bytes = bytes.len(), "speech synthesized");

        Ok(SpeechAudio {
            bytes,
            content_type: SPEECH_CONTENT_TYPE,
        })
    }
}
