//! In-memory state of one practice session.

use serde::Serialize;
use talkagain_types::{ChatMessage, ChatMode, ChatRequest, Character, Message, Role};

/// Everything the UI renders for the current session.
///
/// Messages only ever grow until [`SessionState::reset`]; `processing`,
/// `recording`, and `playing` mirror whatever flow is in flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub character: Option<Character>,
    pub mode: ChatMode,
    pub coaching_enabled: bool,
    pub messages: Vec<Message>,
    pub input_text: String,
    pub started: bool,
    pub processing: bool,
    pub recording: bool,
    pub playing: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            character: None,
            mode: ChatMode::Text,
            coaching_enabled: true,
            messages: Vec::new(),
            input_text: String::new(),
            started: false,
            processing: false,
            recording: false,
            playing: false,
        }
    }
}

/// Opening assistant message shown when a text session starts.
pub fn welcome_message(character: &Character) -> String {
    format!(
        "**Practice Session Starting**\n\n\
         You'll be practicing a conversation with {}, a {} year old who is {}.\n\n\
         Remember: This is a safe space to practice. You can take your time and think through your responses.\n\n\
         How would you like to start the conversation?",
        character.name,
        character.age,
        character.personality.to_lowercase()
    )
}

impl SessionState {
    pub fn new(mode: ChatMode, coaching_enabled: bool) -> Self {
        Self {
            mode,
            coaching_enabled,
            ..Self::default()
        }
    }

    /// Begins a session with `character`. Text mode opens with the welcome
    /// message; the voice modes start silent.
    pub fn start(&mut self, character: Character) {
        self.messages.clear();
        self.input_text.clear();
        if self.mode == ChatMode::Text {
            self.messages.push(Message::assistant(welcome_message(&character)));
        }
        self.character = Some(character);
        self.started = true;
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
    }

    /// The history in the `{role, content}` form the chat endpoint takes.
    pub fn history_for_request(&self) -> Vec<ChatMessage> {
        self.messages.iter().map(Message::to_wire).collect()
    }

    pub fn chat_request(&self) -> ChatRequest {
        ChatRequest {
            messages: self.history_for_request(),
            character: self.character.clone(),
            coaching_enabled: self.coaching_enabled,
        }
    }

    /// Returns to character selection. Mode and coaching carry over.
    pub fn reset(&mut self) {
        *self = Self::new(self.mode, self.coaching_enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talkagain_types::default_catalog;

    fn maya() -> Character {
        default_catalog().remove(0)
    }

    #[test]
    fn text_session_opens_with_welcome() {
        let mut s = SessionState::default();
        s.start(maya());
        assert!(s.started);
        assert_eq!(s.messages.len(), 1);
        assert_eq!(s.messages[0].role, Role::Assistant);
        assert!(s.messages[0]
            .content
            .contains("with Maya, a 14-16 year old who is quiet, thoughtful, may be guarded at first."));
    }

    #[test]
    fn voice_sessions_start_silent() {
        let mut s = SessionState::new(ChatMode::Voice, true);
        s.start(maya());
        assert!(s.messages.is_empty());

        let mut s = SessionState::new(ChatMode::Realtime, true);
        s.start(maya());
        assert!(s.messages.is_empty());
    }

    #[test]
    fn chat_request_carries_history_and_flags() {
        let mut s = SessionState::new(ChatMode::Text, false);
        s.start(maya());
        s.push_user("hi");
        let req = s.chat_request();
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[1].content, "hi");
        assert!(!req.coaching_enabled);
        assert_eq!(req.character.unwrap().name, "Maya");
    }

    #[test]
    fn reset_keeps_mode_and_coaching() {
        let mut s = SessionState::new(ChatMode::Voice, false);
        s.start(maya());
        s.push_user("hello");
        s.reset();
        assert!(!s.started);
        assert!(s.character.is_none());
        assert!(s.messages.is_empty());
        assert_eq!(s.mode, ChatMode::Voice);
        assert!(!s.coaching_enabled);
    }
}
