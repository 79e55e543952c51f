//! The typed-message path and per-message playback.

use crate::error::ClientError;
use crate::ports::{AudioPlayer, Backend};
use crate::session::SessionState;
use std::sync::Arc;
use talkagain_types::{ChatMode, Character};

/// Assistant message appended when a reply could not be obtained.
pub const APOLOGY_REPLY: &str = "I'm sorry, I had trouble responding. Please try again.";

/// Drives a session from typed input.
///
/// Owns the [`SessionState`] and is the only writer of it while no voice
/// loop is running.
pub struct Conversation {
    state: SessionState,
    backend: Arc<dyn Backend>,
    player: Arc<dyn AudioPlayer>,
    notice: Option<String>,
}

impl Conversation {
    pub fn new(
        state: SessionState,
        backend: Arc<dyn Backend>,
        player: Arc<dyn AudioPlayer>,
    ) -> Self {
        Self {
            state,
            backend,
            player,
            notice: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn into_state(self) -> SessionState {
        self.state
    }

    pub fn start(&mut self, character: Character) {
        self.state.start(character);
    }

    /// Sends `text` as the next user turn.
    ///
    /// Returns `Ok(None)` when there was nothing to send or a request is
    /// already in flight. If the chat request fails, the apology message is
    /// appended to the history and the error is returned for display.
    ///
    /// In voice mode the reply is also spoken. A playback failure does not
    /// undo the reply; it is left in [`Conversation::take_notice`].
    pub async fn send_message(&mut self, text: &str) -> Result<Option<String>, ClientError> {
        let text = text.trim();
        if text.is_empty() || self.state.processing {
            return Ok(None);
        }

        self.state.push_user(text);
        self.state.input_text.clear();
        self.state.processing = true;

        let result = self.backend.chat(&self.state.chat_request()).await;
        self.state.processing = false;

        let reply = match result {
            Ok(response) => response.message,
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                self.state.push_assistant(APOLOGY_REPLY);
                return Err(e);
            }
        };
        self.state.push_assistant(reply.clone());

        if self.state.mode == ChatMode::Voice {
            if let Err(e) = self.speak(&reply).await {
                tracing::warn!(error = %e, "reply playback failed");
                self.notice = Some(format!("Could not play the reply: {}", e));
            }
        }
        Ok(Some(reply))
    }

    /// Takes the pending message for the user, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Synthesizes `text` in the character's voice and plays it.
    pub async fn speak(&mut self, text: &str) -> Result<(), ClientError> {
        let audio = self
            .backend
            .synthesize(text, self.state.character.as_ref())
            .await?;
        self.state.playing = true;
        let played = self.player.play(audio).await;
        self.state.playing = false;
        played
    }

    /// Fetches the synthesized audio for the most recent reply.
    pub async fn last_reply_audio(&self) -> Result<Option<Vec<u8>>, ClientError> {
        let Some(message) = self.state.last_assistant() else {
            return Ok(None);
        };
        let audio = self
            .backend
            .synthesize(&message.content, self.state.character.as_ref())
            .await?;
        Ok(Some(audio))
    }

    /// Halts playback and returns to character selection.
    pub fn new_session(&mut self) {
        self.player.halt();
        self.notice = None;
        self.state.reset();
    }
}
