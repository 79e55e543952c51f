//! Seams between the session logic and the outside world.
//!
//! The voice loop and the text path talk to the server, the transcription
//! endpoint, the capture device, and the audio output only through these
//! traits, so every flow can be driven by test doubles.

use crate::error::ClientError;
use async_trait::async_trait;
use talkagain_types::{Character, ChatRequest, ChatResponse};

/// A recorded chunk of microphone audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    /// Container MIME type, e.g. `audio/webm`.
    pub mime_type: String,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Chat replies and speech synthesis.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;

    async fn synthesize(
        &self,
        text: &str,
        character: Option<&Character>,
    ) -> Result<Vec<u8>, ClientError>;
}

/// Speech-to-text for recorded clips.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, ClientError>;
}

/// Short-lived credentials for the real-time voice provider.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, ClientError>;
}

/// The capture device. Acquired once per continuous session and released
/// when the session ends.
#[async_trait]
pub trait Microphone: Send + Sync {
    /// Opens the capture stream if it is not already open.
    async fn acquire(&self) -> Result<(), ClientError>;

    async fn start_recording(&self) -> Result<(), ClientError>;

    /// Stops the current recording and returns what was captured.
    async fn stop_recording(&self) -> Result<AudioClip, ClientError>;

    /// Stops the current recording, if any, and drops its data.
    async fn discard_recording(&self);

    /// Stops every track of the capture stream.
    fn release(&self);

    fn is_acquired(&self) -> bool;
}

/// Audio output for synthesized replies.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Plays the clip, resolving once playback has ended.
    async fn play(&self, audio: Vec<u8>) -> Result<(), ClientError>;

    /// Pauses any playback in progress.
    fn halt(&self);
}

#[async_trait]
impl Transcriber for talkagain_voice::TranscriptionClient {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, ClientError> {
        Ok(talkagain_voice::TranscriptionClient::transcribe(
            self,
            clip.bytes.clone(),
            &clip.mime_type,
        )
        .await?)
    }
}
