use talkagain_voice::VoiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with an error body.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error("{0}")]
    Microphone(String),

    #[error("playback failed: {0}")]
    Playback(String),

    #[error("real-time voice unavailable: {0}")]
    Realtime(String),

    #[error("voice loop has stopped")]
    LoopClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
