//! Voice plumbing for TalkAgain.
//!
//! Everything that turns text into audio or audio into text is delegated to
//! external providers; this crate owns the HTTP contracts with them:
//!
//! - [`TtsService`] renders a character's reply to MP3 through an
//!   OpenAI-compatible `/audio/speech` endpoint, after [`clean_for_speech`]
//!   has removed markdown emphasis and coaching notes.
//! - [`RealtimeTokenService`] exchanges the server-held key pair for a
//!   short-lived access token the browser uses to open its own session with
//!   the empathic-voice service.
//! - [`TranscriptionClient`] posts recorded clips to a transcription
//!   endpoint and returns the text.
//!
//! Character-to-voice mapping is configuration ([`TtsConfig::voices`]),
//! not code.

pub mod config;
pub mod error;
pub mod realtime;
pub mod stt;
pub mod text;
pub mod tts;

pub use config::{RealtimeConfig, TtsConfig};
pub use error::VoiceError;
pub use realtime::RealtimeTokenService;
pub use stt::{recording_file_name, TranscriptionClient};
pub use text::clean_for_speech;
pub use tts::{SpeechAudio, TtsService};
