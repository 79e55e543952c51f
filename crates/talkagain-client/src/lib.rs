//! Client-side session logic for TalkAgain.
//!
//! The browser UI is a thin view over the types here:
//!
//! - [`SessionState`] is the single, serialisable record of the practice
//!   session (character, mode, coaching flag, history, busy flags).
//! - [`Conversation`] drives typed turns against the server.
//! - [`VoiceTurnMachine`] and [`VoiceLoop`] run recorded voice turns, either
//!   as a continuous conversation or a one-shot capture into the input box.
//! - [`RealtimeLauncher`] and [`RealtimeTranscript`] cover the delegated
//!   real-time voice mode.
//!
//! Devices and network endpoints are reached only through the traits in
//! [`ports`]; [`ServerApi`] implements the network side.

pub mod api;
pub mod conversation;
pub mod error;
pub mod ports;
pub mod realtime;
pub mod session;
pub mod voice_loop;
pub mod voice_machine;

pub use api::ServerApi;
pub use conversation::{Conversation, APOLOGY_REPLY};
pub use error::ClientError;
pub use ports::{AudioClip, AudioPlayer, Backend, Microphone, TokenSource, Transcriber};
pub use realtime::{
    RealtimeConnectParams, RealtimeLauncher, RealtimeStatus, RealtimeTranscript, TranscriptLine,
};
pub use session::{welcome_message, SessionState};
pub use voice_loop::{VoiceCommand, VoiceLoop, VoiceLoopHandle, VoiceSnapshot};
pub use voice_machine::{Effect, TurnMode, VoiceEvent, VoicePhase, VoiceTurnMachine};
