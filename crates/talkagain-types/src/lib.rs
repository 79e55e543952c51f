//! Shared types for the TalkAgain practice platform.
//!
//! This crate holds the data model that crosses crate boundaries: the
//! conversation [`Message`], the roleplay [`Character`] catalog, the
//! [`ChatMode`] a session runs in, and the JSON bodies exchanged between the
//! browser-side client and the server endpoints.
//!
//! Nothing here performs I/O. The server, the provider clients, and the
//! client-side session logic all depend on this crate and on nothing else for
//! cross-cutting definitions.

pub mod character;
pub mod wire;

pub use character::{default_catalog, Character};
pub use wire::{
    AccessTokenResponse, ChatMessage, ChatRequest, ChatResponse, ErrorResponse, TranscriptionResponse,
    TtsRequest,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The practising parent.
    User,
    /// The roleplayed teen (and, in coaching mode, the coach).
    Assistant,
}

impl Role {
    /// Returns the wire label for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single turn in a practice conversation.
///
/// Messages are appended to a session in order and never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Strips the timestamp, producing the `{role, content}` form sent to the
    /// chat endpoint.
    pub fn to_wire(&self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// How the user talks to the character during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Typed messages, optional playback of replies.
    #[default]
    Text,
    /// Recorded turns: record, transcribe, reply, synthesize, play.
    Voice,
    /// Live audio delegated to the external empathic-voice service.
    Realtime,
}

/// Token accounting reported by the LLM provider for one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}
