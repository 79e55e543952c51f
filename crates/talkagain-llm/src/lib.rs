//! LLM-backed roleplay replies for TalkAgain.
//!
//! Holds the two persona prompt templates (coached roleplay and
//! in-character-only roleplay) and a chat-completion client for an
//! OpenAI-compatible provider. The client owns prompt assembly, so the
//! server handler only validates input and maps errors.

pub mod client;
pub mod config;
pub mod error;
pub mod prompts;

pub use client::{ChatClient, FALLBACK_REPLY};
pub use config::LlmConfig;
pub use error::LlmError;
pub use prompts::{system_prompt, COACHING_PROMPT, IN_CHARACTER_PROMPT};
