//! Roleplay characters.
//!
//! A [`Character`] is the persona the assistant plays for the whole session.
//! The catalog is configuration data: the server loads it from its config
//! file and falls back to [`default_catalog`] when none is given.

use serde::{Deserialize, Serialize};

/// A named roleplay identity.
///
/// Every field except `name` is optional on the wire so that a partial
/// descriptor posted by a browser still deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    /// Age range, e.g. `"14-16"`.
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub personality: String,
    /// Display hint only. Synthesis picks the voice from the server's
    /// table, keyed by `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    /// Configuration id for the real-time voice service session.
    #[serde(
        default,
        rename = "humeConfigId",
        alias = "realtimeConfigId",
        alias = "realtime_config_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub realtime_config_id: Option<String>,
}

impl Character {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        age: impl Into<String>,
        personality: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            age: age.into(),
            personality: personality.into(),
            voice: None,
            realtime_config_id: None,
        }
    }

    pub fn with_realtime_config(mut self, config_id: impl Into<String>) -> Self {
        self.realtime_config_id = Some(config_id.into());
        self
    }

    /// Free-text persona line appended to the system prompt.
    pub fn persona_context(&self) -> String {
        format!(
            "You are currently roleplaying as {}, age {}. Personality: {}.",
            self.name, self.age, self.personality
        )
    }
}

/// The built-in catalog used when no characters are configured.
pub fn default_catalog() -> Vec<Character> {
    vec![
        Character::new(
            1,
            "Maya",
            "14-16",
            "Quiet, thoughtful, may be guarded at first",
        )
        .with_realtime_config("96382145-7203-46d2-abbe-c760d95019ed"),
        Character::new(
            2,
            "Jordan",
            "16-18",
            "Direct, asks tough questions, testing boundaries",
        )
        .with_realtime_config("73434079-1628-428f-8ee1-32e6df35ce5f"),
    ]
}
